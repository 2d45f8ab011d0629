//! Key replay example
//!
//! Feeds scripted key sequences to an `Editor` and prints the state after each step.
//!
//! Run with `cargo run --example key_replay -- "<text>" "<keys>"` to replay your own keys.

use modal_core::{Editor, Scanner};
use std::sync::{Arc, Mutex};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (text, steps): (String, Vec<String>) = match args.as_slice() {
        [text, keys @ ..] if !keys.is_empty() => (text.replace("\\n", "\n"), keys.to_vec()),
        _ => (
            "fn main() {\n    let x = 1;\n}\n".to_string(),
            ["j", "wx", "A // one<Esc>", "kdd", "p", "3u", "<C-r>"]
                .into_iter()
                .map(String::from)
                .collect(),
        ),
    };

    println!("=== Key replay ===\n");
    let mut editor = Editor::new(text);
    let mut scanner = Scanner::new();

    let edits = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&edits);
    editor.subscribe(move |_| {
        if let Ok(mut count) = counter.lock() {
            *count += 1;
        }
    });

    print_state(&editor, "initial");
    for keys in &steps {
        if let Err(err) = editor.feed(&mut scanner, keys) {
            eprintln!("  error: {err}");
            break;
        }
        print_state(&editor, keys);
        if editor.is_quitting() {
            println!("  quit requested");
            break;
        }
    }

    let count = edits.lock().map(|count| *count).unwrap_or_default();
    println!("\nbuffer edits: {count}");
    println!(
        "history: {} entries, marker at {}",
        editor.history().len(),
        editor.history().current()
    );
}

fn print_state(editor: &Editor, keys: &str) {
    let pos = editor.cursor().pos();
    println!(
        "[{keys}] {} at {}:{}, history {}",
        editor.mode(),
        pos.row + 1,
        pos.col + 1,
        editor.history().len()
    );
    for (row, line) in editor.text().lines().enumerate() {
        let marker = if row == pos.row { '>' } else { ' ' };
        println!("  {marker} {line}");
    }
}

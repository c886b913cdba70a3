//! Ticket Binder CLI tool
//!
//! `structure` turns a pasted numbered list into a folder/note tree;
//! `assemble` binds per-ticket PDFs into one document with a table of
//! contents; `list` previews what `assemble` would pick up.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use ticket_binder::pdf::{
    add_bookmarks, count_pages, locate_pdfs, merge_documents, render_contents_pages,
    resolve_title, write_text_index, LocateOptions, TocEntry,
};
use ticket_binder::ticket::{build_structure, parse_tickets, StructureOptions, SENTINEL};

/// Ticket Binder - structure ticket lists and bind ticket PDFs
#[derive(Parser)]
#[command(name = "ticket-binder")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Paste a numbered list, end with a line saying END, confirm, done
    ticket-binder structure

    # Bind every numbered PDF under the current directory
    ticket-binder assemble -o bound.pdf --index contents.txt

    # Same, with a rendered contents page and no prompt
    ticket-binder assemble --contents-page --yes

    # See what would be bound, in order
    ticket-binder list ./tickets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a numbered ticket list from stdin and create one folder +
    /// one note file per ticket
    Structure {
        /// Root directory for the ticket folders
        #[arg(long, default_value = "tickets")]
        root: PathBuf,

        /// Maximum folder/file name length
        #[arg(long, default_value_t = 150)]
        max_name_length: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Merge all numbered PDFs under a directory into one document with
    /// bookmarks and an optional text index
    Assemble {
        /// Directory to scan for numbered PDFs
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Output PDF file path
        #[arg(short, long, default_value = "bound.pdf")]
        output: PathBuf,

        /// Also write a plain-text index to this path
        #[arg(long)]
        index: Option<PathBuf>,

        /// Prepend rendered contents page(s) to the output
        #[arg(long)]
        contents_page: bool,

        /// Exclude files matching this glob pattern (repeatable)
        #[arg(long)]
        exclude: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the numbered PDFs that would be bound, in order
    List {
        /// Directory to scan for numbered PDFs
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Exclude files matching this glob pattern (repeatable)
        #[arg(long)]
        exclude: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Structure {
            root,
            max_name_length,
            yes,
        } => cmd_structure(root, max_name_length, yes),
        Commands::Assemble {
            root,
            output,
            index,
            contents_page,
            exclude,
            yes,
        } => cmd_assemble(root, output, index, contents_page, exclude, yes),
        Commands::List { root, exclude } => cmd_list(root, exclude),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Read lines from stdin until a line saying END (case-insensitive) or EOF
fn read_until_sentinel() -> io::Result<String> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case(SENTINEL) {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Yes/no prompt; only y/yes (case-insensitive) count as yes
fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} (y/n): ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Clip text for one-line previews
fn clip(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        text.to_string()
    } else {
        let mut out: String = chars[..max_len].iter().collect();
        out.push_str("...");
        out
    }
}

fn cmd_structure(root: PathBuf, max_name_length: usize, yes: bool) -> anyhow::Result<()> {
    println!("Enter the ticket list (finish with a line saying END):");
    println!("Format: <number>. <ticket text>");

    let text = read_until_sentinel()?;
    if text.trim().is_empty() {
        println!("No text entered.");
        return Ok(());
    }

    let records = parse_tickets(&text);
    if records.is_empty() {
        println!("No ticket records found in the input.");
        println!("Tickets must start with a number and a separator, e.g.:");
        println!("1. First ticket text");
        println!("2. Second ticket text");
        return Ok(());
    }

    println!("\nFound {} ticket(s):", records.len());
    for record in &records {
        println!("  {}: {}", record.number, clip(&record.text, 80));
    }

    if !yes && !confirm("\nCreate folders and files?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let options = StructureOptions {
        root,
        max_name_len: max_name_length,
        note_extension: "md".to_string(),
    };
    let report = build_structure(&records, &options)
        .with_context(|| format!("Failed to create root directory {}", options.root.display()))?;

    println!("\nCreating structure in {}/", options.root.display());
    for built in &report.created {
        println!("  + Ticket {}: {}", built.number, built.note.display());
    }
    for failure in &report.failures {
        println!(
            "  ! Ticket {} failed ({} / {}): {}",
            failure.number, failure.folder_name, failure.file_name, failure.reason
        );
    }

    println!("\nResulting tree:");
    print_tree(&options.root);

    println!(
        "\nDone: {} created, {} failed.",
        report.created.len(),
        report.failures.len()
    );
    Ok(())
}

/// Print the directory tree under `root`, indented by depth
fn print_tree(root: &Path) {
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let depth = entry.depth();
        let name = entry.file_name().to_string_lossy();
        if depth == 0 {
            println!("{}/", root.display());
        } else if entry.file_type().is_dir() {
            println!("{}{}/", "  ".repeat(depth), name);
        } else {
            println!("{}{}", "  ".repeat(depth), name);
        }
    }
}

fn cmd_assemble(
    root: PathBuf,
    output: PathBuf,
    index: Option<PathBuf>,
    contents_page: bool,
    exclude: Vec<String>,
    yes: bool,
) -> anyhow::Result<()> {
    let entries = discover(&root, &exclude, Some(&output))?;
    if entries.is_empty() {
        println!("No numbered PDF files found under {}", root.display());
        return Ok(());
    }

    let titles: Vec<String> = entries.iter().map(resolve_title).collect();

    println!("Found {} PDF(s) to bind:", entries.len());
    for (entry, title) in entries.iter().zip(&titles) {
        println!("  {:>4}. {}", entry.number, clip(title, 80));
    }

    if !yes && !confirm(&format!("\nBind into {}?", output.display()))? {
        println!("Cancelled.");
        return Ok(());
    }

    let paths: Vec<&Path> = entries.iter().map(|e| e.path.as_path()).collect();
    let mut outcome = merge_documents(&paths).context("Merge failed")?;

    for skip in &outcome.skipped {
        println!("  ! Skipped {}: {}", skip.path.display(), skip.reason);
    }

    let toc: Vec<TocEntry> = outcome
        .merged
        .iter()
        .map(|m| TocEntry {
            number: entries[m.index].number,
            title: titles[m.index].clone(),
            start_page: m.start_page,
            page_count: m.page_count,
        })
        .collect();

    let page_shift = if contents_page {
        render_contents_pages(&mut outcome.document, &toc).context("Contents page failed")?
    } else {
        0
    };

    add_bookmarks(&mut outcome.document, &toc, page_shift).context("Bookmarks failed")?;

    outcome.document.compress();
    outcome
        .document
        .save(&output)
        .with_context(|| format!("Failed to save {}", output.display()))?;

    let total_pages: usize = toc.iter().map(|t| t.page_count).sum();
    println!(
        "Bound {} document(s), {} page(s), into {}",
        toc.len(),
        total_pages + page_shift,
        output.display()
    );

    if let Some(index_path) = index {
        write_text_index(&index_path, &toc, page_shift)
            .with_context(|| format!("Failed to write index {}", index_path.display()))?;
        println!("Index written to {}", index_path.display());
    }

    Ok(())
}

fn cmd_list(root: PathBuf, exclude: Vec<String>) -> anyhow::Result<()> {
    let entries = discover(&root, &exclude, None)?;
    if entries.is_empty() {
        println!("No numbered PDF files found under {}", root.display());
        return Ok(());
    }

    for entry in &entries {
        let title = resolve_title(entry);
        let pages = match count_pages(&entry.path) {
            Ok(n) => n.to_string(),
            Err(_) => "?".to_string(),
        };
        println!(
            "{:>4}. {} ({} page(s)) - {}",
            entry.number,
            clip(&title, 80),
            pages,
            entry.path.display()
        );
    }

    Ok(())
}

/// Build locate options (default output names plus user patterns, plus
/// the current output name if any) and run discovery
fn discover(
    root: &Path,
    exclude: &[String],
    output: Option<&Path>,
) -> anyhow::Result<Vec<ticket_binder::pdf::PdfEntry>> {
    let mut options = LocateOptions::new(root);

    if let Some(name) = output
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
    {
        options.excluded_names.push(name.to_string());
    }

    for pattern in exclude {
        options = options.exclude(pattern)?;
    }

    locate_pdfs(&options).context("PDF discovery failed")
}

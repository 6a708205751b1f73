//! note-watch
//!
//! Terminal client for the collaboration server.
//!
//! ## Usage
//!
//! ```bash
//! # Print live edits of one or more notes
//! note-watch watch <note_id> [<note_id>...]
//!
//! # Broadcast content to a note's room without saving it
//! note-watch publish <note_id> "<p>hello</p>"
//!
//! # Save content through the notes API, then broadcast it
//! note-watch edit <note_id> "<p>hello</p>"
//! ```

#[cfg(feature = "client")]
use clap::{Parser, Subcommand};

#[cfg(feature = "client")]
#[derive(Parser)]
#[command(name = "note-watch")]
#[command(about = "Watch and edit shared notes from the terminal")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "NOTES_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Bearer token for the socket and notes API
    #[arg(long, env = "NOTES_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "client")]
#[derive(Subcommand)]
enum Commands {
    /// Join rooms and print every edit made by others
    Watch {
        #[arg(required = true)]
        note_ids: Vec<String>,
    },

    /// Broadcast content to a room without saving it
    Publish { note_id: String, content: String },

    /// Save content through the notes API and broadcast it
    Edit { note_id: String, content: String },
}

#[cfg(feature = "client")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use notes_collab::client::{
        Broadcaster, ClientConfig, CollabClient, HttpNoteStore, NoteSession, SessionEvent,
    };
    use notes_collab::shared::{NoteEdit, NoteId};

    dotenv::dotenv().ok();
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::new(&cli.server)?;
    config.set_token(cli.token);

    let (handle, mut updates) = CollabClient::connect(&config).await?;

    match cli.command {
        Commands::Watch { note_ids } => {
            for raw in &note_ids {
                handle.join(&NoteId::parse(raw)?);
            }
            eprintln!("Watching {} note(s), Ctrl-C to stop", note_ids.len());
            loop {
                tokio::select! {
                    update = updates.recv() => match update {
                        Some(edit) => println!("{}\t{}", edit.note_id, edit.content),
                        None => {
                            eprintln!("Connection closed");
                            break;
                        }
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
        Commands::Publish { note_id, content } => {
            handle.publish_edit(NoteEdit::new(NoteId::parse(&note_id)?, content));
            // dropping the last handle flushes the queue and closes the socket
            drop(handle);
            while updates.recv().await.is_some() {}
        }
        Commands::Edit { note_id, content } => {
            let note_id = NoteId::parse(&note_id)?;
            let session = NoteSession::new(
                HttpNoteStore::new(config.clone()),
                handle,
                config.save_debounce(),
            );
            let mut events = session.subscribe();
            session.load_notes(Some(&note_id)).await?;
            if session.edit_content(content).is_none() {
                return Err(format!("note {} not found", note_id).into());
            }

            loop {
                match events.recv().await? {
                    SessionEvent::Saved(note) => {
                        println!("Saved {}", note.id);
                        break;
                    }
                    SessionEvent::SaveFailed { error, .. } => return Err(error.into()),
                    _ => {}
                }
            }
            session.close_note();
            // the session owns the last handle; dropping it flushes the
            // edit and leave frames before the socket closes
            drop(session);
            while updates.recv().await.is_some() {}
        }
    }

    Ok(())
}

#[cfg(not(feature = "client"))]
fn main() {
    eprintln!("note-watch requires the 'client' feature to be enabled.");
    eprintln!("Run with: cargo run --bin note-watch --features client");
    std::process::exit(1);
}

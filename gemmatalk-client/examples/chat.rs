//! Ask the local backend one question and print the reply as it types out.
//!
//! Make sure the backend is running on port 8000 and run:
//!   cargo run -p gemmatalk-client --example chat -- "How can I relax tonight?"

use std::io::Write;

use gemmatalk_client::ChatClient;
use gemmatalk_stream::{Presenter, Session};
use gemmatalk_types::{ChatRequest, Update};
use tokio_util::sync::CancellationToken;

struct Terminal;

impl Presenter for Terminal {
    fn update(&mut self, update: &Update) {
        match update {
            Update::Status(message) => println!("[status] {message}"),
            Update::Progress(progress) => println!("[pull] {progress}"),
            Update::Failed(message) => println!("\n{message}"),
            Update::ResetScheduled(delay) => println!("[model ready, resetting in {delay:?}]"),
            _ => {}
        }
    }

    fn reveal(&mut self, ch: char, _displayed: &str) {
        print!("{ch}");
        let _ = std::io::stdout().flush();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let question = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Say hello in one sentence.".into());

    let client = ChatClient::new().user_name("friend");
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut session = Session::new();
    client
        .send(ChatRequest::new(question), &mut session, &mut Terminal, &cancel)
        .await?;
    println!();

    if let Some(delay) = session.state().reset_after {
        tokio::time::sleep(delay).await;
        session.reset();
    }
    Ok(())
}

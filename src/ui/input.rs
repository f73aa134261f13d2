// src/ui/input.rs
// DOCUMENTATION: Search field
// PURPOSE: Each input line is an explicit search submission

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

use crate::controller::UiEvent;

/// Forward input lines to the controller until EOF
/// DOCUMENTATION: Blank lines are forwarded too; the controller ignores them.
/// EOF or a read error ends the session.
pub async fn read_queries<R>(reader: R, events: UnboundedSender<UiEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if events.send(UiEvent::SearchSubmitted(line)).is_err() {
                    // Controller is gone
                    return;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read search input: {}", e);
                break;
            }
        }
    }

    let _ = events.send(UiEvent::Shutdown);
}

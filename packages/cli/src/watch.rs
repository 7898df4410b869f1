use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use console::{Term, style};

use crate::api::{ApiClient, Defect};

/// Poll the pending-reminder list on a fixed interval and redraw it.
///
/// Each poll fully replaces the displayed set rather than appending, so
/// reminders acknowledged or finished elsewhere disappear on the next tick.
/// A failed acknowledge simply resurfaces on the next poll.
pub fn run(client: &ApiClient, interval: Duration, ack_all: bool) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })?;
    }

    let term = Term::stdout();

    while running.load(Ordering::SeqCst) {
        // A dropped poll is not fatal; keep the loop alive and retry.
        match client.pending_notifications() {
            Ok(pending) => {
                term.clear_screen()?;
                render(&term, &pending)?;

                if ack_all {
                    for defect in &pending {
                        // Already-gone records are fine; the next poll reconciles.
                        if let Err(err) = client.acknowledge(defect.id) {
                            term.write_line(
                                &style(format!("ack #{} failed: {err}", defect.id))
                                    .dim()
                                    .to_string(),
                            )?;
                        }
                    }
                }
            }
            Err(err) => {
                term.write_line(&style(format!("poll failed: {err}")).dim().to_string())?;
            }
        }

        // Sleep in short slices so Ctrl-C lands promptly.
        let mut remaining = interval;
        while running.load(Ordering::SeqCst) && !remaining.is_zero() {
            let slice = remaining.min(Duration::from_millis(200));
            std::thread::sleep(slice);
            remaining -= slice;
        }
    }

    term.write_line("Stopped.")?;
    Ok(())
}

fn render(term: &Term, pending: &[Defect]) -> Result<()> {
    term.write_line(&format!(
        "{}  {}",
        style("Punchlist reminders").bold(),
        style(chrono::Local::now().format("%H:%M:%S")).dim(),
    ))?;

    if pending.is_empty() {
        term.write_line(&style("No defects currently due.").dim().to_string())?;
        return Ok(());
    }

    for defect in pending {
        let due = defect
            .notification_due_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let owner = defect.created_by_username.as_deref().unwrap_or("-");
        term.write_line(&format!(
            "  {}  {}  {}",
            style(format!("#{}", defect.id)).cyan(),
            style(&defect.name).bold(),
            style(format!(
                "[{} | floor {} | axis {}]",
                defect.defect_type, defect.floor, defect.axis_location
            ))
            .dim(),
        ))?;
        term.write_line(&format!(
            "        due {}  logged by {}  ({})",
            style(due).yellow(),
            owner,
            defect.status,
        ))?;
    }
    term.write_line("")?;
    term.write_line(&style("Dismiss with: punchlist ack <id>   (Ctrl-C to quit)").dim().to_string())?;
    Ok(())
}

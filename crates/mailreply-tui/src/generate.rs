use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use anyhow::{Context, Result, bail};
use colored::*;
use mailreply_core::{Clipboard, HttpReplyClient, ReplyRequestController, RequestStatus, SystemClipboard, Tone};

/// Read the email, generate one reply, and print it.
pub async fn run(
    client: HttpReplyClient,
    file: Option<&Path>,
    tone: Tone,
    copy: bool,
) -> Result<()> {
    let email = read_email(file)?;

    let mut controller = ReplyRequestController::new(Arc::new(client));
    controller.update_email_content(email);
    controller.update_tone(tone);

    if !controller.submit() {
        bail!("The email is empty; nothing to reply to");
    }

    let tone_label = if tone == Tone::None { "default" } else { tone.display_name() };
    eprintln!("✉️  Generating a {} reply...", tone_label.bold().cyan());
    controller.wait_for_response().await;

    match controller.status() {
        RequestStatus::Succeeded => {
            let reply = controller.reply().unwrap_or_default();
            println!("{}", reply);

            if copy {
                let mut clipboard = SystemClipboard::new();
                copy_reply(&mut controller, &mut clipboard)?;
            }
            Ok(())
        }
        _ => {
            let message = controller.error_message().unwrap_or_default();
            bail!("{}", message.red())
        }
    }
}

fn copy_reply(controller: &mut ReplyRequestController, clipboard: &mut dyn Clipboard) -> Result<()> {
    if controller.copy_result(clipboard)? {
        eprintln!("{}", "📋 Copied to clipboard".green());
    }
    Ok(())
}

fn read_email(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read email from {}", path.display())),
        None => {
            let mut email = String::new();
            std::io::stdin()
                .read_to_string(&mut email)
                .context("Failed to read email from stdin")?;
            Ok(email)
        }
    }
}

pub fn list_tones() {
    println!("\n{}", "🎨 Available Tones".bold().blue());
    println!("{}", "=".repeat(20).dimmed());
    for tone in Tone::all() {
        let note = if tone == Tone::None { " (no tone hint sent)" } else { "" };
        println!("  • {}{}", tone.display_name().green(), note.dimmed());
    }
}

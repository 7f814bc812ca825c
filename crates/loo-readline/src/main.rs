use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use loo_core::jury::VoteBadge;
use loo_core::session::view::{APP_TAGLINE, APP_TITLE, PLEA_PLACEHOLDER};
use loo_core::session::{CardSlot, JuryCardView, StageController, StageView};
use loo_interaction::{CourtApiClient, FileCaptureAdapter};

/// One line of user input, or the intent to leave the court.
enum Input {
    Line(String),
    Quit,
}

fn read_input(rl: &mut DefaultEditor, prompt: &str) -> Input {
    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim().to_string();
                if trimmed == "quit" || trimmed == "exit" {
                    return Input::Quit;
                }
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(&line);
                }
                return Input::Line(trimmed);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => return Input::Quit,
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                return Input::Quit;
            }
        }
    }
}

fn print_jury(cards: &[JuryCardView]) {
    for card in cards {
        let slot = match &card.slot {
            CardSlot::Placeholder => "-".bright_black().to_string(),
            CardSlot::Thinking => "Thinking...".yellow().to_string(),
            CardSlot::Badge {
                badge: VoteBadge::Affirmative,
                label,
            } => label.green().bold().to_string(),
            CardSlot::Badge {
                badge: VoteBadge::Negative,
                label,
            } => label.red().bold().to_string(),
            // NoVote never carries a badge; render like a placeholder
            CardSlot::Badge { .. } => "-".bright_black().to_string(),
        };
        println!(
            "  {} {} {} {}",
            card.juror.icon,
            format!("{:<12}", card.juror.name),
            format!("{:<22}", card.juror.description).bright_black(),
            slot
        );
    }
}

/// The main entry point for the Lucky Loo terminal client.
///
/// Walks the user through the court's stages in a rustyline loop:
/// welcome, photo capture (file-backed), plea entry, deliberation, and the
/// verdict with per-juror vote badges.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CourtApiClient::from_env();
    let controller = StageController::new();
    let mut rl = DefaultEditor::new()?;

    println!();
    println!("{}", format!("🚽 {}", APP_TITLE).bright_magenta().bold());
    println!("{}", APP_TAGLINE.bright_black());

    match client.health().await {
        Ok(health) => println!(
            "{}",
            format!("Court is in session ({} v{})", health.service, health.version).bright_black()
        ),
        Err(err) => {
            tracing::debug!(%err, "health probe failed");
            println!(
                "{}",
                "Warning: the court is not answering its health check.".yellow()
            );
        }
    }

    loop {
        match controller.view().await {
            StageView::Welcome {
                heading,
                intro,
                action_label,
                demo_mode,
                jury,
            } => {
                println!();
                println!("{}", heading.bold());
                println!("{}", intro.bright_black());
                println!();
                println!("{}", "THE JURY".bright_black());
                print_jury(&jury);
                println!();
                let demo_state = if demo_mode { "on" } else { "off" };
                let prompt = format!(
                    "[enter] {}  |  'demo' toggles demo mode (currently {})  |  'quit'\n>> ",
                    action_label, demo_state
                );
                match read_input(&mut rl, &prompt) {
                    Input::Quit => break,
                    Input::Line(line) if line == "demo" => {
                        controller.set_demo_mode(!demo_mode).await;
                    }
                    Input::Line(_) => controller.begin().await,
                }
            }
            StageView::Capturing { heading, hint, .. } => {
                println!();
                println!("{}", format!("📸 {}", heading).bold());
                println!("{}", hint.bright_black());
                let prompt = "photo path  |  [enter] skip  |  'quit'\n>> ";
                match read_input(&mut rl, prompt) {
                    Input::Quit => break,
                    Input::Line(line) if line.is_empty() || line == "skip" => {
                        controller.skip_capture().await;
                    }
                    Input::Line(path) => {
                        let adapter = FileCaptureAdapter::new(path);
                        if !controller.capture_photo(&adapter).await {
                            println!("{}", "No usable image at that path.".yellow());
                        }
                    }
                }
            }
            StageView::Pleading {
                heading,
                hint,
                image_attached,
                ..
            } => {
                println!();
                println!("{}", format!("📝 {}", heading).bold());
                println!("{}", hint.bright_black());
                if image_attached {
                    println!("{}", "Your face is on file.".bright_black());
                }
                println!("{}", format!("e.g. {}", PLEA_PLACEHOLDER).bright_black());
                match read_input(&mut rl, ">> ") {
                    Input::Quit => break,
                    Input::Line(line) if line.is_empty() => {
                        // Empty plea never leaves the pleading stage
                        println!("{}", "The court needs to hear something.".yellow());
                    }
                    Input::Line(plea) => {
                        controller.set_plea(plea).await;

                        let submit_controller = controller.clone();
                        let submit_client = client.clone();
                        let deliberation = tokio::spawn(async move {
                            submit_controller.submit(&submit_client).await
                        });

                        // Wait for the submission task to take the stage so
                        // the banner is not skipped; stop early if the
                        // verdict already landed.
                        loop {
                            if let StageView::Deliberating { heading, hint, jury } =
                                controller.view().await
                            {
                                println!();
                                println!("{}", format!("⚖️  {}", heading).bright_purple().bold());
                                println!("{}", hint.bright_black());
                                print_jury(&jury);
                                break;
                            }
                            if deliberation.is_finished() {
                                break;
                            }
                            tokio::task::yield_now().await;
                        }

                        deliberation.await?;
                    }
                }
            }
            StageView::Deliberating { .. } => {
                // Submission runs to completion inside the pleading arm, so
                // the loop never observes this stage on its own; nothing to
                // prompt for if it ever does.
                tokio::task::yield_now().await;
            }
            StageView::Verdict {
                granted,
                banner,
                slots,
                roast,
                reasoning,
                jury,
                celebration_active,
                shake_active,
            } => {
                println!();
                if celebration_active {
                    println!("{}", "🎉 ✨ 🎉 ✨ 🎉 ✨ 🎉".bright_yellow());
                }
                if shake_active {
                    println!("{}", "✖ ✖ ✖".red());
                }
                let banner_line = format!("{} {}", if granted { "🎉" } else { "🚫" }, banner);
                if granted {
                    println!("{}", banner_line.bright_green().bold());
                } else {
                    println!("{}", banner_line.bright_red().bold());
                }
                println!("  {}", slots.join(" "));
                println!();
                println!("{}", "THE PIT BOSS SAYS".bright_black());
                println!("{}", format!("\"{}\"", roast).italic());
                println!("{}", reasoning.bright_black());
                println!();
                println!("{}", "JURY VOTES".bright_black());
                print_jury(&jury);
                println!();
                match read_input(&mut rl, "[enter] Try Again  |  'quit'\n>> ") {
                    Input::Quit => break,
                    Input::Line(_) => controller.reset().await,
                }
            }
        }
    }

    println!("{}", "Court adjourned. House always wins.".bright_green());
    Ok(())
}

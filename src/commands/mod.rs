/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`      — Interactive terminal chat
- `ask`       — Answer a single question and exit
- `directory` — Print the company directory (no API access needed)

The HTTP surface lives in [`crate::server`].
*/

use colored::Colorize;

use crate::directory::{CompanySummary, StudentRecord};

// Special commands parser for the chat loop
pub mod special_commands;

/// Render the company directory the way the chat and `directory` commands show it
///
/// Companies with a single student are listed plainly; others carry a count.
///
/// # Examples
///
/// ```
/// use hooswho::commands::format_companies;
/// use hooswho::directory::CompanySummary;
///
/// let text = format_companies(&[
///     CompanySummary { company: "Amazon".to_string(), count: 1 },
///     CompanySummary { company: "ICF".to_string(), count: 2 },
/// ]);
/// assert!(text.contains("• Amazon\n"));
/// assert!(text.contains("(2 students)"));
/// ```
pub fn format_companies(companies: &[CompanySummary]) -> String {
    if companies.is_empty() {
        return "No companies found matching your search\n".to_string();
    }

    let mut out = format!("{} companies represented\n\n", companies.len());
    for summary in companies {
        if summary.count == 1 {
            out.push_str(&format!("• {}\n", summary.company));
        } else {
            out.push_str(&format!(
                "• {} ({} students)\n",
                summary.company.bold(),
                summary.count
            ));
        }
    }
    out
}

/// Render a short card per student
pub fn format_students(students: &[StudentRecord]) -> String {
    let mut out = String::new();
    for student in students {
        out.push_str(&format!(
            "{}\n  {} at {}\n  Industries: {}\n  Contact: {}\n\n",
            student.name.bold(),
            student.current_role,
            student.current_company,
            student.industries,
            student.contact.cyan()
        ));
    }
    out
}

// Interactive chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Runs a readline loop over one [`Session`]. Special commands are handled
    //! locally; everything else goes through [`Assistant::submit`].

    use super::special_commands::{parse_special_command, print_help, SpecialCommand};
    use super::*;
    use crate::assistant::Assistant;
    use crate::error::Result;
    use crate::session::Session;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `assistant` - Chat pipeline shared with every session
    /// * `featured_count` - How many classmates `/featured` shows
    pub async fn run_chat(assistant: &Assistant, featured_count: usize) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let mut session = assistant.new_session();
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(assistant.directory().len());
        if !session.welcome_acknowledged() {
            print_career_services_reminder();
            session.acknowledge_welcome();
        }

        loop {
            let prompt = format!("{} ", "hoos?>".truecolor(229, 114, 0).bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Err(e) = rl.add_history_entry(trimmed) {
                        tracing::debug!("Failed to record history entry: {}", e);
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Clear) => {
                            assistant.clear(&mut session);
                            println!("{}\n", "Chat history cleared".green());
                            continue;
                        }
                        Ok(SpecialCommand::Companies(filter)) => {
                            let companies = assistant.directory().companies(filter.as_deref());
                            println!("\n{}", format_companies(&companies));
                            continue;
                        }
                        Ok(SpecialCommand::Featured) => {
                            let students = assistant.directory().featured(featured_count);
                            println!("\n{}", format_students(&students));
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&mut session);
                            continue;
                        }
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                            continue;
                        }
                    }

                    match assistant.submit(&mut session, trimmed).await {
                        Ok(reply) => println!("\n{}\n", reply),
                        Err(e) => eprintln!("{}\n", e.user_message().yellow()),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye, Hoo!");
        Ok(())
    }

    fn print_welcome_banner(student_count: usize) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                   Welcome to Hoos Who?                       ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "Identify and connect with your MSBA classmates working at your dream company or dream industry.\n"
        );
        println!("Directory: {} students", student_count.to_string().bold());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_career_services_reminder() {
        println!(
            "{}",
            "Have you met with Darden Career Services yet?"
                .truecolor(229, 114, 0)
                .bold()
        );
        println!(
            "Our career services professionals provide personalized advice, resume reviews,\n\
             interview prep, and strategic guidance that AI cannot replace. They're extremely\n\
             approachable and here to help!\n"
        );
    }

    fn print_status_display(session: &mut Session) {
        let history = session.transcript().len();
        let window = session.rate_window_mut();
        let remaining = window.remaining();
        let limit = window.limit();

        println!("\nSession:           {}", session.id());
        println!("Conversation Size: {} messages", history);
        println!("Queries Left:      {}/{} this hour\n", remaining, limit);
    }
}

// Single question command handler
pub mod ask {
    //! One-shot question handler.

    use crate::assistant::Assistant;
    use crate::error::Result;

    /// Answer one question and print the reply
    ///
    /// Rejected input is reported on stderr with its user-facing message and
    /// returned as an error so the process exits non-zero.
    pub async fn run_ask(assistant: &Assistant, question: &str) -> Result<()> {
        let mut session = assistant.new_session();
        match assistant.submit(&mut session, question).await {
            Ok(reply) => {
                println!("{}", reply);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", e.user_message());
                Err(e.into())
            }
        }
    }
}

// Company directory command handler
pub mod directory {
    //! Company directory listing.

    use super::*;
    use crate::directory::Directory;

    /// Print the company directory
    pub fn run_directory(directory: &Directory, filter: Option<&str>) {
        println!("{} Students\n", directory.len().to_string().bold());
        print!("{}", format_companies(&directory.companies(filter)));
    }
}

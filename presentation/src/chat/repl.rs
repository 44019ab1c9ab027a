//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::cli::signal::CtrlCGuard;
use crate::config::ReplConfig;
use crate::{ConsoleFormatter, ProgressReporter};
use colored::Colorize;
use council_application::{
    ExecutionParams, GenerateTitleUseCase, RunCouncilError, RunCouncilInput, RunCouncilUseCase,
};
use council_domain::{Conversation, ConversationRepository, CouncilConfig, Question};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;
use tracing::warn;

/// What the loop should do after a slash command
#[derive(Debug, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    Exit,
}

/// Interactive chat REPL
///
/// Each question is answered by the full council with the conversation so
/// far as history. The first question titles the conversation.
pub struct ChatRepl {
    use_case: RunCouncilUseCase,
    title_use_case: GenerateTitleUseCase,
    repository: Option<Arc<dyn ConversationRepository>>,
    council: CouncilConfig,
    execution: ExecutionParams,
    config: ReplConfig,
    conversation: Conversation,
}

impl ChatRepl {
    /// Create a new ChatRepl with a fresh conversation
    pub fn new(
        use_case: RunCouncilUseCase,
        title_use_case: GenerateTitleUseCase,
        council: CouncilConfig,
    ) -> Self {
        Self {
            use_case,
            title_use_case,
            repository: None,
            council,
            execution: ExecutionParams::default(),
            config: ReplConfig::default(),
            conversation: new_conversation(),
        }
    }

    /// Save the conversation after every turn
    pub fn with_repository(mut self, repository: Arc<dyn ConversationRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Continue a previously saved conversation
    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(path) = &self.config.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) == CommandOutcome::Exit {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_question(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = &self.config.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│           LLM Council - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        self.print_models();
        if !self.conversation.is_empty() {
            println!(
                "Resumed: {} ({} messages)",
                self.conversation.title,
                self.conversation.turns.len()
            );
            println!();
        }
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /models           - Show the panel and chairman");
        println!("  /history          - Show this conversation");
        println!("  /new              - Start a new conversation");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    fn print_models(&self) {
        println!(
            "Panel: {}",
            self.council
                .panel()
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!("Chairman: {}", self.council.chairman);
        println!();
    }

    /// Handle slash commands
    fn handle_command(&mut self, cmd: &str) -> CommandOutcome {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                return CommandOutcome::Exit;
            }
            "/help" | "/h" | "/?" => {
                println!();
                Self::print_help();
            }
            "/models" => {
                println!();
                self.print_models();
            }
            "/history" => {
                println!();
                println!("{}", ConsoleFormatter::format_history(&self.conversation));
            }
            "/new" => {
                self.conversation = new_conversation();
                println!("Started a new conversation.");
                println!();
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
            }
        }
        CommandOutcome::Continue
    }

    async fn process_question(&mut self, line: &str) {
        let question = match Question::new(line) {
            Ok(question) => question,
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };
        println!();

        let ctrl_c = CtrlCGuard::install();
        let input = RunCouncilInput::new(question.clone(), self.council.clone())
            .with_history(self.conversation.turns.clone())
            .with_execution(self.execution.clone())
            .with_cancellation(ctrl_c.token());

        let result = if self.config.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute_with_progress(input, &progress).await
        } else {
            self.use_case.execute(input).await
        };
        drop(ctrl_c);

        let result = match result {
            Ok(result) => result,
            Err(RunCouncilError::Cancelled) => {
                println!("{}", "Cancelled.".yellow());
                println!();
                return;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };

        println!();
        print!("{}", ConsoleFormatter::format_synthesis_only(&result));
        println!();

        if !self.conversation.has_title() && self.conversation.is_empty() {
            let title = self.title_use_case.execute(&question).await;
            self.conversation.set_title(title);
        }
        self.conversation
            .record_exchange(question.into_content(), &result);

        if let Some(repository) = &self.repository
            && let Err(e) = repository.save(&self.conversation).await
        {
            warn!("Could not save conversation {}: {}", self.conversation.id, e);
            eprintln!("Warning: conversation was not saved: {}", e);
        }
    }
}

/// A fresh conversation with a timestamp id
pub fn new_conversation() -> Conversation {
    let now = chrono::Utc::now();
    Conversation::new(
        now.format("%Y%m%d-%H%M%S-%3f").to_string(),
        now.to_rfc3339(),
    )
}

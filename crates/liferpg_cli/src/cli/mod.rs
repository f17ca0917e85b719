use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: liferpg add "Buy milk" --xp 25
    Add {
        title: Option<String>,
        /// XP awarded on completion (defaults to the configured value, or 10)
        #[arg(long)]
        xp: Option<u32>,
    },
    /// Delete a task
    ///
    /// Example: liferpg delete task-123
    Delete {
        id: String,
    },
    /// Mark a task or daily quest as completed
    ///
    /// Example: liferpg done task-123
    /// Example: liferpg done quest-456
    Done {
        id: String,
    },
    /// Undo a completion and refund its XP
    ///
    /// Example: liferpg undo task-123
    Undo {
        id: String,
    },
    /// Manage the quest pool
    ///
    /// Example: liferpg quest add "Morning run" --xp 30
    Quest {
        #[command(subcommand)]
        quest: QuestCommand,
    },
    /// Reroll today's daily quests
    ///
    /// Example: liferpg reroll
    Reroll,
    /// List tasks, today's quests, or the quest pool
    ///
    /// Example: liferpg list daily
    List {
        #[command(subcommand)]
        list: ListCommand,
    },
    /// Show level, XP, streak, and today's progress
    ///
    /// Example: liferpg status
    Status,
    /// Show the day-by-day journal
    ///
    /// Example: liferpg history --limit 7
    History {
        /// Most recent entries to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show achievements and their unlock dates
    ///
    /// Example: liferpg achievements
    Achievements,
    /// Print a shareable progress card
    ///
    /// Example: liferpg share
    Share,
    /// Run the day rollover check without any other change
    ///
    /// Example: liferpg sync
    Sync,
}

#[derive(Subcommand, Debug)]
pub enum QuestCommand {
    /// Add a quest to the pool
    ///
    /// Example: liferpg quest add "Morning run" --xp 30
    Add {
        title: Option<String>,
        /// XP awarded on completion (defaults to the configured value, or 10)
        #[arg(long)]
        xp: Option<u32>,
    },
    /// Remove a quest from the pool
    ///
    /// Example: liferpg quest delete quest-456
    Delete {
        id: String,
    },
    /// Make a quest eligible for the daily roll
    ///
    /// Example: liferpg quest enable quest-456
    Enable {
        id: String,
    },
    /// Exclude a quest from the daily roll
    ///
    /// Example: liferpg quest disable quest-456
    Disable {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListCommand {
    /// List the free-form task list
    ///
    /// Example: liferpg list tasks
    Tasks,
    /// List today's rolled daily quests
    ///
    /// Example: liferpg list daily
    Daily,
    /// List the quest pool
    ///
    /// Example: liferpg list quests
    Quests,
}

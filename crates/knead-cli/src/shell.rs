//! Line-oriented crafting shell.
//!
//! Each input line is one command. Arguments are split on whitespace and may
//! be wrapped in double quotes. Recipe names with spaces can also be typed
//! unquoted wherever the recipe is the last free-form argument.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use knead_crafting::{CraftingContext, CraftingError};
use thiserror::Error;
use tracing::debug;

use crate::config::CliConfig;

const HELP: &str = "\
Commands:
  recipes                              list all recipes
  recipe <name>                        show a recipe's inputs and outputs
  inventories                          list all inventories
  inventory <name>                     show an inventory
  craft <inventory> <recipe> <qty>     craft a recipe qty times
  check <inventory> <recipe> <qty>     check a craft without doing it
  max <inventory> <recipe>             how many times a recipe can be crafted
  craftable <inventory>                recipes the inventory can craft now
  help                                 show this text
  quit                                 leave the shell
";

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// First word is not a known command
    #[error("Unknown command {0:?}, try \"help\"")]
    Unknown(String),
    /// Wrong number of arguments
    #[error("Usage: {0}")]
    Usage(&'static str),
    /// A quote was opened and never closed
    #[error("Unterminated quote")]
    UnterminatedQuote,
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List recipe names
    Recipes,
    /// Show one recipe
    Recipe(String),
    /// List inventory names
    Inventories,
    /// Show one inventory
    Inventory(String),
    /// Craft, quantity kept as typed so the library reports bad values
    Craft {
        /// Target inventory
        inventory: String,
        /// Recipe to apply
        recipe: String,
        /// Quantity text
        quantity: String,
    },
    /// Dry-run a craft
    Check {
        /// Target inventory
        inventory: String,
        /// Recipe to apply
        recipe: String,
        /// Quantity text
        quantity: String,
    },
    /// Largest affordable multiplier
    Max {
        /// Target inventory
        inventory: String,
        /// Recipe to apply
        recipe: String,
    },
    /// Recipes affordable right now
    Craftable(String),
    /// Print help
    Help,
    /// Leave the shell
    Quit,
}

/// Splits a line into words, honouring double quotes.
fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            },
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            },
            c => {
                current.push(c);
                in_word = true;
            },
        }
    }
    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

impl Command {
    /// Parses one line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let words = tokenize(line)?;
        let Some((head, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match head.to_lowercase().as_str() {
            "recipes" | "list" => Self::Recipes,
            "recipe" | "view" => Self::Recipe(joined(args, "recipe <name>")?),
            "inventories" => Self::Inventories,
            "inventory" | "inv" => Self::Inventory(joined(args, "inventory <name>")?),
            "craft" | "make" => {
                let (inventory, recipe, quantity) =
                    craft_args(args, "craft <inventory> <recipe> <qty>")?;
                Self::Craft {
                    inventory,
                    recipe,
                    quantity,
                }
            },
            "check" => {
                let (inventory, recipe, quantity) =
                    craft_args(args, "check <inventory> <recipe> <qty>")?;
                Self::Check {
                    inventory,
                    recipe,
                    quantity,
                }
            },
            "max" => {
                let usage = "max <inventory> <recipe>";
                let (inventory, rest) = args.split_first().ok_or(CommandError::Usage(usage))?;
                Self::Max {
                    inventory: inventory.clone(),
                    recipe: joined(rest, usage)?,
                }
            },
            "craftable" => Self::Craftable(joined(args, "craftable <inventory>")?),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn joined(args: &[String], usage: &'static str) -> Result<String, CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(args.join(" "))
}

fn craft_args(
    args: &[String],
    usage: &'static str,
) -> Result<(String, String, String), CommandError> {
    match args {
        [inventory, recipe @ .., quantity] if !recipe.is_empty() => {
            Ok((inventory.clone(), recipe.join(" "), quantity.clone()))
        },
        _ => Err(CommandError::Usage(usage)),
    }
}

/// Whether the shell should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line
    Continue,
    /// Stop
    Quit,
}

/// Interactive shell over one crafting context.
pub struct Shell {
    context: CraftingContext,
    config: CliConfig,
}

impl Shell {
    /// Creates a shell.
    pub fn new(context: CraftingContext, config: CliConfig) -> Self {
        Self { context, config }
    }

    /// Returns the context.
    #[cfg(test)]
    pub fn context(&self) -> &CraftingContext {
        &self.context
    }

    /// Reads commands until end of input or `quit`.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        write!(output, "{}", self.config.prompt)?;
        output.flush()?;
        for line in input.lines() {
            let line = line?;
            let (text, flow) = self.execute_line(&line);
            output.write_all(text.as_bytes())?;
            if flow == Flow::Quit {
                break;
            }
            write!(output, "{}", self.config.prompt)?;
            output.flush()?;
        }
        Ok(())
    }

    /// Executes one line and returns the text to print.
    pub fn execute_line(&mut self, line: &str) -> (String, Flow) {
        match Command::parse(line) {
            Ok(Some(command)) => {
                debug!(?command, "Executing command");
                let flow = if command == Command::Quit {
                    Flow::Quit
                } else {
                    Flow::Continue
                };
                let text = match self.execute(command) {
                    Ok(text) => text,
                    Err(e) => format!("{e}\n"),
                };
                (text, flow)
            },
            Ok(None) => (String::new(), Flow::Continue),
            Err(e) => (format!("{e}\n"), Flow::Continue),
        }
    }

    fn execute(&mut self, command: Command) -> Result<String, CraftingError> {
        let ctx = &mut self.context;
        let text = match command {
            Command::Recipes => ctx.list_recipes().to_string(),
            Command::Recipe(name) => ctx.view_recipe(&name)?.to_string(),
            Command::Inventories => {
                let mut text = String::from("-- All inventories --\n");
                for name in ctx.inventory_names() {
                    let _ = writeln!(text, "- {name}");
                }
                text
            },
            Command::Inventory(name) => ctx.view_inventory(&name)?.to_string(),
            Command::Craft {
                inventory,
                recipe,
                quantity,
            } => {
                let mut text = ctx
                    .craft(&inventory, &recipe, quantity.as_str())?
                    .to_string();
                if self.config.show_inventory_after_craft {
                    text.push_str(&ctx.view_inventory(&inventory)?.to_string());
                }
                text
            },
            Command::Check {
                inventory,
                recipe,
                quantity,
            } => {
                let plan = ctx.check_craft(&inventory, &recipe, quantity.as_str())?;
                let mut text = format!(
                    "{inventory} can craft {} x {}\nMaterials needed:\n",
                    plan.multiplier, plan.recipe
                );
                for q in &plan.consumed {
                    let _ = writeln!(text, "- {} {}", q.quantity, q.item);
                }
                text
            },
            Command::Max { inventory, recipe } => {
                let n = ctx.max_craftable(&inventory, &recipe)?;
                format!("{inventory} can craft {recipe} {n} time(s)\n")
            },
            Command::Craftable(inventory) => {
                let recipes = ctx.craftable_recipes(&inventory)?;
                let mut text = format!("-- Craftable in {inventory} --\n");
                if recipes.is_empty() {
                    text.push_str("(nothing)\n");
                }
                for recipe in recipes {
                    let _ = writeln!(text, "- {}", recipe.name());
                }
                text
            },
            Command::Help => HELP.to_string(),
            Command::Quit => String::new(),
        };
        Ok(text)
    }
}

use crate::{event::*, plugin::*};
use anyhow::Result;
use std::time::Duration;

/// How long the user gets to answer each prompt.
const STEP_TIMEOUT: Duration = Duration::from_secs(30);

const PROMPT_OPERATION: &str =
    "💡 **Simple Calculator**\nSelect operation:\n1️⃣ Add\n2️⃣ Subtract\n3️⃣ Multiply\n4️⃣ Divide";
const PROMPT_FIRST: &str = "🔢 Enter first number:";
const PROMPT_SECOND: &str = "🔢 Enter second number:";
const TIMED_OUT: &str = "⏳ You took too long to respond. Please try again.";

/// Interactive calculator.  The command opens a dialogue with its author in the current
/// channel and walks through operation choice and two operands; a missed step aborts the
/// whole exchange with no result.
pub struct Calculator;

#[serenity::async_trait]
impl Plugin for Calculator {
    fn name(&self) -> &'static str {
        "calculator"
    }

    async fn usage(&self, ctx: &Context) -> Option<String> {
        let prefix = &ctx.cfg.read().await.general.command_prefix;
        Some(format!(
            "{}{} - 🧮 use a simple calculator",
            prefix,
            self.name()
        ))
    }

    async fn handle(&self, ctx: &Context, event: &Event) -> Result<EventHandled> {
        // Replies belonging to a pending dialogue are consumed here, before any command
        // plugin can interpret them.
        if let Event::Message(msg) = event {
            let dialogues = ctx.vstate.read().await.dialogues.clone();
            if dialogues.route(msg.author.id, msg.channel_id, &msg.content) {
                return Ok(EventHandled::Yes);
            }
        }

        let Some((msg, _)) = event.is_bot_cmd(ctx, self.name()).await else {
            return Ok(EventHandled::No);
        };

        let dialogues = ctx.vstate.read().await.dialogues.clone();
        let mut dialogue = dialogues.begin(msg.author.id, msg.channel_id);
        let channel = msg.channel_id;

        channel.say(ctx.cache_http, PROMPT_OPERATION).await?;
        let Some(choice) = dialogue.next_reply(STEP_TIMEOUT).await else {
            channel.say(ctx.cache_http, TIMED_OUT).await?;
            return Ok(EventHandled::Yes);
        };

        channel.say(ctx.cache_http, PROMPT_FIRST).await?;
        let Some(first) = dialogue.next_reply(STEP_TIMEOUT).await else {
            channel.say(ctx.cache_http, TIMED_OUT).await?;
            return Ok(EventHandled::Yes);
        };

        channel.say(ctx.cache_http, PROMPT_SECOND).await?;
        let Some(second) = dialogue.next_reply(STEP_TIMEOUT).await else {
            channel.say(ctx.cache_http, TIMED_OUT).await?;
            return Ok(EventHandled::Yes);
        };

        let reply = run(choice.trim(), first.trim(), second.trim());
        channel.say(ctx.cache_http, reply).await?;
        Ok(EventHandled::Yes)
    }
}

enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Operation::Add),
            "2" => Some(Operation::Subtract),
            "3" => Some(Operation::Multiply),
            "4" => Some(Operation::Divide),
            _ => None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Operation::Add => "➕",
            Operation::Subtract => "➖",
            Operation::Multiply => "✖️",
            Operation::Divide => "➗",
        }
    }
}

/// Produce the final reply from the three collected inputs.
fn run(choice: &str, first: &str, second: &str) -> String {
    let Ok(a) = first.parse::<f64>() else {
        return format!("🚨 Error: `{first}` is not a number.");
    };
    let Ok(b) = second.parse::<f64>() else {
        return format!("🚨 Error: `{second}` is not a number.");
    };
    let Some(operation) = Operation::from_choice(choice) else {
        return "❌ Invalid operation. Please select a valid operation.".to_owned();
    };

    let result = match operation {
        Operation::Add => a + b,
        Operation::Subtract => a - b,
        Operation::Multiply => a * b,
        Operation::Divide => {
            if b == 0.0 {
                return "🚨 Error: Division by zero!".to_owned();
            }
            a / b
        }
    };

    format!(
        "{} {} {} = {}",
        fmt_num(a),
        operation.symbol(),
        fmt_num(b),
        fmt_num(result)
    )
}

// Integral values keep a trailing `.0`, so `3` reads back as the float it was parsed as.
fn fmt_num(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_renders_python_style_floats() {
        assert_eq!(run("1", "3", "4"), "3.0 ➕ 4.0 = 7.0");
    }

    #[test]
    fn every_operation_has_its_symbol() {
        assert_eq!(run("2", "5", "1.5"), "5.0 ➖ 1.5 = 3.5");
        assert_eq!(run("3", "1.5", "2"), "1.5 ✖️ 2.0 = 3.0");
        assert_eq!(run("4", "9", "2"), "9.0 ➗ 2.0 = 4.5");
    }

    #[test]
    fn division_by_zero_is_an_error_message() {
        assert_eq!(run("4", "5", "0"), "🚨 Error: Division by zero!");
        assert_eq!(run("4", "5", "0.0"), "🚨 Error: Division by zero!");
    }

    #[test]
    fn unrecognized_choice_is_reported() {
        assert_eq!(
            run("9", "1", "2"),
            "❌ Invalid operation. Please select a valid operation."
        );
    }

    #[test]
    fn unparseable_operands_are_reported() {
        assert_eq!(run("1", "three", "4"), "🚨 Error: `three` is not a number.");
        assert_eq!(run("1", "3", "x"), "🚨 Error: `x` is not a number.");
    }
}

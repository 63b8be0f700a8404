use crate::errors::{AppError, AppResult};
use crate::state::{OptionLeg, Position, Scenario, Variant};
use std::io::{BufRead, Write};

pub const INVALID_NUMBER: &str = "Invalid input, please enter a valid number.";
pub const INVALID_INTEGER: &str = "Invalid input, please enter a valid integer.";
pub const NOT_POSITIVE: &str = "Please enter a positive integer.";

/// Console prompting with local recovery from malformed input.
/// End of input is not recoverable and surfaces as `AppError::InputClosed`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    line: String,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            line: String::with_capacity(64),
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> AppResult<&str> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        self.line.clear();
        let n = self.input.read_line(&mut self.line)?;
        if n == 0 {
            return Err(AppError::InputClosed(format!("no answer to \"{}\"", prompt.trim())));
        }
        Ok(self.line.trim())
    }

    /// Re-prompts until the answer parses as a float.
    pub fn read_f64(&mut self, prompt: &str) -> AppResult<f64> {
        loop {
            let parsed = self.ask(prompt)?.parse::<f64>();
            match parsed {
                Ok(v) => return Ok(v),
                Err(_) => {
                    tracing::debug!(prompt, "rejected non-numeric answer");
                    self.say(INVALID_NUMBER)?;
                }
            }
        }
    }

    /// Re-prompts until the answer is an integer greater than zero.
    pub fn read_positive_u32(&mut self, prompt: &str) -> AppResult<u32> {
        loop {
            let parsed = self.ask(prompt)?.parse::<i64>();
            match parsed {
                Ok(v) if v > 0 => match u32::try_from(v) {
                    Ok(v) => return Ok(v),
                    Err(_) => self.say(INVALID_INTEGER)?,
                },
                Ok(_) => self.say(NOT_POSITIVE)?,
                Err(_) => self.say(INVALID_INTEGER)?,
            }
        }
    }
}

/// Asks for every scenario input in order. The last question depends on the
/// variant: initial slider price, or the single price to evaluate.
pub fn collect_scenario<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    variant: Variant,
) -> AppResult<Scenario> {
    let purchase_price = prompter.read_f64("Enter your average share purchase price: ")?;
    let contracts =
        prompter.read_positive_u32("Enter the number of call contracts sold (1 contract = 100 shares): ")?;
    let strike_price = prompter.read_f64("Enter the option strike price: ")?;
    let premium_per_share = prompter.read_f64("Enter the premium received per share: ")?;
    let evaluation_price = match variant {
        Variant::Interactive => prompter.read_f64("Enter the initial expiration price for the slider: ")?,
        Variant::Static => prompter.read_f64("Enter the stock price at expiration to analyze: ")?,
    };

    let scenario = Scenario {
        position: Position::from_contracts(purchase_price, contracts),
        call: OptionLeg {
            strike_price,
            premium_per_share,
        },
        evaluation_price,
    };

    tracing::info!(
        purchase = purchase_price,
        shares = scenario.position.num_shares,
        strike = strike_price,
        premium = premium_per_share,
        price = evaluation_price,
        "scenario collected"
    );

    Ok(scenario)
}

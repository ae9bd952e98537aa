use crate::pipe::{Pipe, PipeError, PipeResult};
use async_trait::async_trait;

/// A pipe that parses a string into an integer
#[derive(Default)]
pub struct ParseIntPipe;

#[async_trait]
impl Pipe for ParseIntPipe {
    type Input = String;
    type Output = i64;

    async fn transform(&self, input: String) -> PipeResult<i64> {
        input
            .trim()
            .parse::<i64>()
            .map_err(|_| PipeError::Validation(format!("Invalid integer: '{}'", input)))
    }
}

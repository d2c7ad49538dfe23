//! Plan, guidelines and tips generation: prompt construction, output
//! schemas, and response validation.

pub mod generator;
pub mod parse;
pub mod prompt;
pub mod schema;

pub use generator::Generator;
pub use parse::{parse_guidelines, parse_meal_plan, parse_tips};
pub use prompt::{PLAN_DAYS, TIP_COUNT, guidelines_prompt, meal_plan_prompt, tips_prompt};
pub use schema::{guidelines_schema, meal_plan_schema, tips_schema};

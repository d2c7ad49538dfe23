//! `nutriguide onboard` command: collect a profile and generate the first
//! plan.
//!
//! With `--name` every answer comes from flags (unset ones take the form
//! defaults). Without it the four form steps are asked on stdin, skipping
//! any field already given as a flag.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;

use nutriguide_core::controller::AppController;
use nutriguide_core::onboarding::{OnboardingForm, STEP_COUNT};
use nutriguide_core::views::first_name;
use nutriguide_store::models::{ActivityLevel, Gender, Goal, UserProfile};

use crate::config::NutriConfig;
use crate::generate_cmd;

#[derive(Debug, Default, Clone, clap::Args)]
pub struct OnboardArgs {
    /// Your name (skips the interactive questions)
    #[arg(long)]
    pub name: Option<String>,
    /// Age in years
    #[arg(long)]
    pub age: Option<u32>,
    /// male, female or other
    #[arg(long)]
    pub gender: Option<Gender>,
    /// Height in cm (100-250)
    #[arg(long)]
    pub height: Option<f64>,
    /// Weight in kg (30-200)
    #[arg(long)]
    pub weight: Option<f64>,
    /// sedentary, light, moderate, active or very_active
    #[arg(long)]
    pub activity: Option<ActivityLevel>,
    /// weight_loss, weight_gain, maintenance, better_skin or high_energy
    #[arg(long)]
    pub goal: Option<Goal>,
    /// Comma-separated allergies, e.g. "peanuts, shellfish"
    #[arg(long)]
    pub allergies: Option<String>,
    /// Free-text dietary preferences, e.g. "vegetarian"
    #[arg(long)]
    pub preferences: Option<String>,
}

fn apply_args(form: &mut OnboardingForm, args: &OnboardArgs) {
    if let Some(name) = &args.name {
        form.name = name.clone();
    }
    if let Some(age) = args.age {
        form.set_age(age);
    }
    if let Some(gender) = args.gender {
        form.gender = gender;
    }
    if let Some(height) = args.height {
        form.set_height(height);
    }
    if let Some(weight) = args.weight {
        form.set_weight(weight);
    }
    if let Some(activity) = args.activity {
        form.activity_level = activity;
    }
    if let Some(goal) = args.goal {
        form.goal = goal;
    }
    if let Some(allergies) = &args.allergies {
        form.allergies = allergies.clone();
    }
    if let Some(preferences) = &args.preferences {
        form.preferences = preferences.clone();
    }
}

fn choices<T: Display>(all: &[T]) -> String {
    all.iter().map(ToString::to_string).collect::<Vec<_>>().join("/")
}

// -----------------------------------------------------------------------
// Prompting
// -----------------------------------------------------------------------

struct Prompter<'a, R, W> {
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            write!(self.out, "{label}: ")?;
        } else {
            write!(self.out, "{label} [{default}]: ")?;
        }
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("input ended before onboarding finished");
        }
        let answer = line.trim();
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer.to_string()
        })
    }

    fn ask_parsed<T>(&mut self, label: &str, default: T) -> Result<T>
    where
        T: FromStr + Display,
        T::Err: Display,
    {
        loop {
            let raw = self.ask(label, &default.to_string())?;
            match raw.parse() {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.out, "  {e}")?,
            }
        }
    }

    fn heading(&mut self, step: u8, title: &str) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Step {step}/{STEP_COUNT}: {title}")?;
        Ok(())
    }
}

/// Walk the form on `input`, asking only for fields `args` leaves unset.
pub fn collect_profile<R: BufRead, W: Write>(
    args: &OnboardArgs,
    input: &mut R,
    out: &mut W,
) -> Result<UserProfile> {
    let mut form = OnboardingForm::new();
    apply_args(&mut form, args);
    let mut p = Prompter { input, out };

    p.heading(form.step(), "about you")?;
    if args.name.is_none() {
        form.name = p.ask("Name", "")?;
    }
    if args.age.is_none() {
        let age = p.ask_parsed("Age", form.age())?;
        form.set_age(age);
    }
    if args.gender.is_none() {
        let label = format!("Gender ({})", choices(&Gender::ALL));
        form.gender = p.ask_parsed(&label, form.gender)?;
    }
    while let Err(e) = form.next_step() {
        writeln!(p.out, "  {e}")?;
        form.name = p.ask("Name", "")?;
    }

    p.heading(form.step(), "body")?;
    if args.height.is_none() {
        let height = p.ask_parsed("Height in cm", form.height())?;
        form.set_height(height);
    }
    if args.weight.is_none() {
        let weight = p.ask_parsed("Weight in kg", form.weight())?;
        form.set_weight(weight);
    }
    form.next_step()?;

    p.heading(form.step(), "goals")?;
    if args.goal.is_none() {
        let label = format!("Goal ({})", choices(&Goal::ALL));
        form.goal = p.ask_parsed(&label, form.goal)?;
    }
    if args.activity.is_none() {
        let label = format!("Activity ({})", choices(&ActivityLevel::ALL));
        form.activity_level = p.ask_parsed(&label, form.activity_level)?;
    }
    form.next_step()?;

    p.heading(form.step(), "diet")?;
    if args.preferences.is_none() {
        form.preferences = p.ask("Preferences", "")?;
    }
    if args.allergies.is_none() {
        form.allergies = p.ask("Allergies (comma-separated)", "")?;
    }

    Ok(form.finish()?)
}

/// Build the profile from flags alone.
pub fn profile_from_args(args: &OnboardArgs) -> Result<UserProfile> {
    let mut form = OnboardingForm::new();
    apply_args(&mut form, args);
    Ok(form.complete()?)
}

// -----------------------------------------------------------------------
// Command
// -----------------------------------------------------------------------

pub async fn run_onboard(
    config: &NutriConfig,
    args: OnboardArgs,
    cancel: &CancellationToken,
) -> Result<()> {
    let slots = config.slots()?;
    if slots.load_profile()?.is_some() {
        bail!("a profile already exists; run `nutriguide reset --yes` to start over");
    }
    let generator = config.generator()?;

    let profile = if args.name.is_some() {
        profile_from_args(&args)?
    } else {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        collect_profile(&args, &mut input, &mut io::stdout())?
    };

    let mut controller = AppController::load(slots, generator)?;
    println!();
    println!("Thanks, {}! Generating your plan...", first_name(&profile.name));
    controller.complete_onboarding(profile, cancel).await?;
    generate_cmd::report(&controller)
}

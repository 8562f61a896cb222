//! Choplan signup - command line client
//!
//! Usage:
//!   choplan-signup signup <draft.json>
//!   choplan-signup login <username>
//!   choplan-signup logout

use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use choplan_signup::draft::SignupDraft;
use choplan_signup::{
    Config, FileSessionStore, HttpAccountService, LoginController, RegistrationError,
    RegistrationWorkflow, UsernameStatus,
};
use shared::{FormField, Language, Notice, NoticeKind, RegistrationType, Role};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: choplan-signup <signup <draft.json> | login <username> | logout>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "choplan_signup=debug,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().context("failed to load configuration")?;
    tracing::info!("Environment: {}", config.environment);

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["signup", draft] => signup(&config, draft).await,
        ["login", username] => login(&config, username).await,
        ["logout"] => logout(&config),
        _ => bail!(USAGE),
    }
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let line = self
            .lines
            .next_line()
            .await?
            .context("standard input closed")?;
        Ok(line.trim().to_string())
    }
}

fn user_error(language: Language) -> impl Fn(RegistrationError) -> anyhow::Error {
    move |e| anyhow!(e.user_message(language))
}

fn print_notices(workflow: &mut RegistrationWorkflow) {
    let language = workflow.language();
    for notice in workflow.drain_notices() {
        print_notice(notice, language);
    }
}

fn print_notice(notice: Notice, language: Language) {
    println!("[{}] {}", notice.title(language), notice.message(language));
}

async fn signup(config: &Config, draft_path: &str) -> anyhow::Result<()> {
    let language = config.ui.language;
    let json = tokio::fs::read_to_string(draft_path)
        .await
        .with_context(|| format!("failed to read {}", draft_path))?;
    let draft = SignupDraft::from_json(&json).with_context(|| format!("invalid draft {}", draft_path))?;

    let service = HttpAccountService::new(&config.api)?;
    let sessions = FileSessionStore::new(&config.session.path);
    let mut workflow = RegistrationWorkflow::new(Arc::new(service), Arc::new(sessions), language);
    draft.apply(&mut workflow);

    let status = workflow
        .check_username_availability()
        .await
        .map_err(user_error(language))?
        .applied()
        .context("username check was superseded")?;
    print_notices(&mut workflow);
    if status == UsernameStatus::Taken {
        bail!("{}", NoticeKind::UsernameTaken.message(language));
    }

    workflow
        .send_verification_code()
        .await
        .map_err(user_error(language))?;
    print_notices(&mut workflow);

    let mut prompt = Prompt::new();
    let code = prompt.ask("Verification code: ").await?;
    workflow.update_field(FormField::VerificationCode, code);

    if draft.role == Role::Owner && draft.registration_type == RegistrationType::Existing {
        let search = draft
            .restaurant_search
            .as_ref()
            .context("an owner claiming an existing restaurant needs restaurantSearch")?;
        let results = workflow
            .search_restaurants(&search.query, search.mode)
            .await
            .map_err(user_error(language))?
            .applied()
            .unwrap_or_default();
        print_notices(&mut workflow);
        if results.is_empty() {
            bail!("no restaurant matches {:?}", search.query);
        }

        for (index, restaurant) in results.iter().enumerate() {
            println!(
                "{:>3}. {} {}",
                index + 1,
                restaurant.display_name(),
                restaurant.road_address.as_deref().unwrap_or_default()
            );
        }
        let choice = prompt.ask("Restaurant number: ").await?;
        let restaurant = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| results.get(i))
            .with_context(|| format!("invalid choice {:?}", choice))?;
        workflow.select_restaurant(restaurant);
    }

    let outcome = workflow
        .submit()
        .await
        .map_err(user_error(language))?
        .applied()
        .context("signup response was discarded")?;
    print_notices(&mut workflow);
    println!("Next: {}", config.routes.path_for(outcome.redirect));
    Ok(())
}

async fn login(config: &Config, username: &str) -> anyhow::Result<()> {
    let language = config.ui.language;
    let service = HttpAccountService::new(&config.api)?;
    let sessions = FileSessionStore::new(&config.session.path);
    let controller = LoginController::new(Arc::new(service), Arc::new(sessions), language);

    let password = Prompt::new().ask("Password: ").await?;
    let outcome = controller
        .sign_in(username, &password)
        .await
        .map_err(user_error(language))?;

    print_notice(Notice::new(NoticeKind::LoginComplete), language);
    println!("Next: {}", config.routes.path_for(outcome.redirect));
    Ok(())
}

fn logout(config: &Config) -> anyhow::Result<()> {
    let sessions = FileSessionStore::new(&config.session.path);
    let controller = LoginController::new(
        Arc::new(HttpAccountService::new(&config.api)?),
        Arc::new(sessions),
        config.ui.language,
    );

    match controller.current_session()? {
        Some(stored) => {
            controller.sign_out()?;
            println!(
                "Signed out {} (signed in at {})",
                stored.session.username.as_deref().unwrap_or("unknown user"),
                stored.saved_at.format("%Y-%m-%d %H:%M")
            );
        }
        None => println!("No stored session"),
    }
    Ok(())
}

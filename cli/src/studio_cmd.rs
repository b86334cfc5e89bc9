//! Studio subcommands over the Molbert API.

#[cfg(test)]
#[path = "studio_cmd_test.rs"]
mod studio_cmd_test;

use std::path::Path;

use mask::{DisplayRect, PaintOutcome, Point, Size};
use studio::auth::{self, Route, RouteDecision};
use studio::net::types::{AdminUserUpdate, ItemCreate, ItemUpdate, UserRegister};
use studio::state::settings::{daily_used_percent, is_quota_exhausted};
use studio::state::{HistoryPanel, SettingsState, StudioState};
use studio::{ApiClient, GenerationParams, LocalFile, Mode, StudioConfig};

use crate::{
    AdminCommand, AdminSubcommand, AuthCommand, AuthSubcommand, BillingCommand, BillingSubcommand, CliError, Command,
    HistoryArgs, ImageCommand, ImageSubcommand, ItemsCommand, ItemsSubcommand, OutputArgs, ProfileCommand,
    ProfileSubcommand, print_json,
};

/// Longest side of the virtual canvas edits are painted on.
const CANVAS_MAX_SIDE: f64 = 1024.0;

pub(crate) async fn run(config: &StudioConfig, command: Command) -> Result<(), CliError> {
    let client = ApiClient::new(config)?;
    match command {
        Command::Auth(auth) => run_auth(&client, auth).await,
        Command::Image(image) => {
            require(&client, Route::Studio)?;
            run_image(&client, image).await
        }
        Command::History(args) => {
            require(&client, Route::Studio)?;
            run_history(&client, args).await
        }
        Command::Usage => {
            require(&client, Route::Settings)?;
            run_usage(&client).await
        }
        Command::Profile(profile) => {
            require(&client, Route::Settings)?;
            run_profile(&client, profile).await
        }
        Command::Billing(billing) => {
            require(&client, Route::Settings)?;
            run_billing(&client, billing).await
        }
        Command::Items(items) => {
            require(&client, Route::Items)?;
            run_items(&client, items).await
        }
        Command::Admin(admin) => {
            require(&client, Route::Admin)?;
            run_admin(&client, admin).await
        }
        Command::Training(_) => Err(CliError::InvalidArgument("training commands use the portal client".to_owned())),
    }
}

/// Apply the route gate with the stored token.
fn require(client: &ApiClient, route: Route) -> Result<(), CliError> {
    match auth::guard(route, client.tokens().is_logged_in()) {
        RouteDecision::Allow => Ok(()),
        RouteDecision::Redirect(_) => Err(CliError::NotSignedIn),
    }
}

// ===== AUTH =====

async fn run_auth(client: &ApiClient, command: AuthCommand) -> Result<(), CliError> {
    match command.command {
        AuthSubcommand::Login { email, password } => {
            let user = client.login(&email, &password).await?;
            eprintln!("signed in as {}", user.email);
            Ok(())
        }
        AuthSubcommand::Logout => {
            client.logout()?;
            eprintln!("signed out");
            Ok(())
        }
        AuthSubcommand::Signup { email, password, confirm, full_name } => {
            let register = UserRegister { email, password, full_name };
            let user = client.signup(&register, &confirm).await?;
            print_json(&user)
        }
        AuthSubcommand::Recover { email } => {
            let message = client.recover_password(&email).await?;
            println!("{}", message.message);
            Ok(())
        }
        AuthSubcommand::Reset { token, password, confirm } => {
            let message = client.reset_password(&token, &password, &confirm).await?;
            println!("{}", message.message);
            Ok(())
        }
        AuthSubcommand::Me => {
            require(client, Route::Home)?;
            print_json(&client.current_user().await?)
        }
    }
}

// ===== IMAGES =====

async fn run_image(client: &ApiClient, command: ImageCommand) -> Result<(), CliError> {
    match command.command {
        ImageSubcommand::Create { prompt, output, out } => {
            let mut state = StudioState::new(DisplayRect::default());
            state.set_mode(Mode::CreateImage);
            state.set_prompt(prompt);
            state.set_params(with_output(GenerationParams::text_defaults(), &output));
            submit_and_save(client, &mut state, &out).await
        }
        ImageSubcommand::Edit { image, prompt, at, output, out } => {
            let file = LocalFile::from_path(&image)?;
            let natural = file.natural_size()?;
            let mut state = StudioState::new(fit_canvas(natural));
            state.set_mode(Mode::EditImage);
            state.upload(file)?;
            state.set_prompt(prompt);
            state.set_params(with_output(GenerationParams::edit_defaults(), &output));
            if let Some(at) = at {
                mark(&mut state, parse_point(&at)?)?;
            }
            let hotspot = state.hotspot();
            tracing::info!(x = hotspot.x, y = hotspot.y, "edit hotspot");
            submit_and_save(client, &mut state, &out).await
        }
        ImageSubcommand::Compose { image, extras, prompt, output, out } => {
            let mut state = StudioState::new(DisplayRect::default());
            state.set_mode(Mode::ComposeImage);
            if let Some(image) = image {
                state.upload(LocalFile::from_path(&image)?)?;
            }
            let files = extras.iter().map(|p| LocalFile::from_path(p)).collect::<Result<Vec<_>, _>>()?;
            let offered = files.len();
            let added = state.add_compose_files(files);
            if added < offered {
                tracing::warn!(offered, added, "some compose images were skipped");
            }
            state.set_prompt(prompt);
            state.set_params(with_output(GenerationParams::edit_defaults(), &output));
            submit_and_save(client, &mut state, &out).await
        }
        ImageSubcommand::Filter { image, prompt, out } => {
            let result = client.filter_image(LocalFile::from_path(&image)?, &prompt).await?;
            report_saved(&result.save_to(&out)?);
            Ok(())
        }
        ImageSubcommand::Adjust { image, prompt, out } => {
            let result = client.adjust_image(LocalFile::from_path(&image)?, &prompt).await?;
            report_saved(&result.save_to(&out)?);
            Ok(())
        }
    }
}

async fn submit_and_save(client: &ApiClient, state: &mut StudioState, out: &Path) -> Result<(), CliError> {
    state.submit(client).await?;
    if let Some(status) = state.status() {
        eprintln!("{status}");
    }
    let generated = state
        .generated()
        .ok_or_else(|| CliError::InvalidArgument("no image was generated".to_owned()))?;
    report_saved(&generated.save_to(out)?);
    Ok(())
}

fn report_saved(path: &Path) {
    println!("{}", path.display());
}

fn with_output(mut params: GenerationParams, output: &OutputArgs) -> GenerationParams {
    if let Some(aspect_ratio) = &output.aspect_ratio {
        params.aspect_ratio.clone_from(aspect_ratio);
    }
    if let Some(format) = &output.format {
        params.output_format.clone_from(format);
    }
    if let Some(resolution) = &output.resolution {
        params.resolution.clone_from(resolution);
    }
    params
}

/// Canvas at the origin showing `natural` scaled down to fit.
fn fit_canvas(natural: Size) -> DisplayRect {
    let longest = natural.width.max(natural.height);
    let scale = if longest > CANVAS_MAX_SIDE { CANVAS_MAX_SIDE / longest } else { 1.0 };
    DisplayRect::new(0.0, 0.0, natural.width * scale, natural.height * scale)
}

/// Paint a single dab at `natural`, making it the edit hotspot.
fn mark(state: &mut StudioState, natural: Point) -> Result<(), CliError> {
    let painter = state.painter_mut();
    painter.set_brush(true);
    let display = painter.mapping().natural_to_display(natural);
    let outcome = painter.pointer_down(display);
    painter.pointer_up();
    match outcome {
        PaintOutcome::Painted { .. } => Ok(()),
        PaintOutcome::OutOfBounds | PaintOutcome::Ignored => Err(CliError::InvalidArgument(format!(
            "point {},{} is outside the image",
            natural.x, natural.y
        ))),
    }
}

/// Parse `X,Y` in image pixels.
fn parse_point(raw: &str) -> Result<Point, CliError> {
    let invalid = || CliError::InvalidArgument(format!("expected X,Y but got `{raw}`"));
    let (x, y) = raw.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if x < 0.0 || y < 0.0 {
        return Err(invalid());
    }
    Ok(Point::new(x, y))
}

// ===== HISTORY / USAGE =====

async fn run_history(client: &ApiClient, args: HistoryArgs) -> Result<(), CliError> {
    let mut panel = HistoryPanel::default();
    panel.toggle_and_load(client).await?;
    match args.fetch {
        Some(id) => {
            let file = panel.fetch_file(client, &id).await?;
            report_saved(&file.save_to(&args.out)?);
            Ok(())
        }
        None => print_json(&panel.entries),
    }
}

async fn run_usage(client: &ApiClient) -> Result<(), CliError> {
    let usage = client.usage().await?;
    print_json(&usage)?;
    eprintln!("daily quota used: {}%", daily_used_percent(&usage));
    if is_quota_exhausted(&usage) {
        eprintln!("quota exhausted; upgrade with `molbert billing upgrade`");
    }
    Ok(())
}

// ===== ACCOUNT =====

async fn run_profile(client: &ApiClient, command: ProfileCommand) -> Result<(), CliError> {
    let mut settings = SettingsState::default();
    match command.command {
        ProfileSubcommand::Show => {
            settings.load(client).await?;
            print_json(&settings.user)?;
            print_json(&settings.usage)
        }
        ProfileSubcommand::Update { full_name, email } => {
            settings.load(client).await?;
            if let Some(full_name) = full_name {
                settings.full_name = full_name;
            }
            if let Some(email) = email {
                settings.email = email;
            }
            let saved = settings.save_profile(client).await;
            if let Some(status) = &settings.profile_status {
                eprintln!("{status}");
            }
            saved.map_err(CliError::from)
        }
        ProfileSubcommand::Password { current, new, confirm } => {
            settings.current_password = current;
            settings.new_password = new;
            settings.confirm_password = confirm;
            let changed = settings.change_password(client).await;
            if let Some(status) = &settings.password_status {
                eprintln!("{status}");
            }
            changed.map_err(CliError::from)
        }
    }
}

async fn run_billing(client: &ApiClient, command: BillingCommand) -> Result<(), CliError> {
    match command.command {
        BillingSubcommand::Upgrade { plan } => {
            let payment = SettingsState::default().upgrade(client, &plan).await?;
            eprintln!("payment {} created; complete checkout at:", payment.payment_id);
            println!("{}", payment.confirmation_url);
            Ok(())
        }
    }
}

async fn run_items(client: &ApiClient, command: ItemsCommand) -> Result<(), CliError> {
    match command.command {
        ItemsSubcommand::List { page } => print_json(&client.list_items(page).await?.data),
        ItemsSubcommand::Create { title, description } => {
            print_json(&client.create_item(&ItemCreate { title, description }).await?)
        }
        ItemsSubcommand::Update { id, title, description } => {
            print_json(&client.update_item(&id, &ItemUpdate { title, description }).await?)
        }
        ItemsSubcommand::Delete { id } => {
            println!("{}", client.delete_item(&id).await?.message);
            Ok(())
        }
    }
}

async fn run_admin(client: &ApiClient, command: AdminCommand) -> Result<(), CliError> {
    let acting = client.current_user().await?;
    if auth::guard_with_user(Route::Admin, Some(&acting)) != RouteDecision::Allow {
        return Err(CliError::NotAdmin);
    }
    match command.command {
        AdminSubcommand::Users { page } => print_json(&client.list_users(page).await?.data),
        AdminSubcommand::Update { id, plan, credits, active, superuser } => {
            let update = AdminUserUpdate { plan, credits_balance: credits, is_active: active, is_superuser: superuser };
            print_json(&client.admin_update_user(&id, &update).await?)
        }
        AdminSubcommand::Delete { id } => {
            println!("{}", client.admin_delete_user(&acting, &id).await?.message);
            Ok(())
        }
    }
}

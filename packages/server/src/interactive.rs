//! Interactive mode for the server.
//!
//! Prompts the user for bind address and port before starting the server.

use dialoguer::{Confirm, Input};
use incident_dashboard_incident_models::ZoneMode;
use incident_dashboard_source::IncidentSource;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks the user for a bind address and port, sets the corresponding
/// environment variables (`BIND_ADDR`, `PORT`), and delegates to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(source: &dyn IncidentSource, zone: ZoneMode) -> std::io::Result<()> {
    println!("Incident Dashboard Server");
    println!();

    let (default_addr, default_port) = super::bind_from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(default_addr.clone())
        .interact_text()
        .unwrap_or(default_addr);

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default(default_port.to_string())
        .interact_text()
        .unwrap_or_else(|_| default_port.to_string());

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
    }

    if !Confirm::new()
        .with_prompt(format!(
            "Load {} and start server on {bind_addr}:{port_str}?",
            source.name()
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(source, zone).await
}

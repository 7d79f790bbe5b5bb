use rental_api::{ErrorBody, RentalApiError, UserProfile};
use serde_json::Value;

pub fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn describe_user(profile: &UserProfile) -> String {
    let mut line = format!(
        "{} ({}) - {}",
        profile.display_name(),
        profile.username,
        profile.role
    );
    if let Some(email) = &profile.email {
        line.push_str(&format!(" <{}>", email));
    }
    line
}

/// Validation messages as `field: message`, one per line
pub fn field_lines(body: &ErrorBody) -> Vec<String> {
    body.field_errors()
        .into_iter()
        .flat_map(|(field, messages)| {
            messages
                .into_iter()
                .map(move |message| format!("{}: {}", field, message))
        })
        .collect()
}

/// Text shown to the user when a command fails
pub fn error_report(err: &anyhow::Error) -> Vec<String> {
    let Some(api_error) = err.downcast_ref::<RentalApiError>() else {
        return vec![format!("Error: {:#}", err)];
    };

    match api_error {
        e if e.is_terminal() => vec![
            "Your session has ended.".to_string(),
            "Run `rentctl login` to sign in again.".to_string(),
        ],
        RentalApiError::InvalidCredentials(_) => vec!["Invalid username or password.".to_string()],
        e => {
            let fields = e.error_body().map(field_lines).unwrap_or_default();
            if fields.is_empty() {
                vec![format!("Error: {}", e)]
            } else {
                let mut lines = vec!["The server rejected the request:".to_string()];
                lines.extend(fields);
                lines
            }
        }
    }
}

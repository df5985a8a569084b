use std::io;

use smsplanet::{Credentials, MessageId, SmsPlanetClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key = required_env("SMSPLANET_KEY")?;
    let password = required_env("SMSPLANET_PASSWORD")?;
    let message_id_raw = required_env("SMSPLANET_MESSAGE_ID")?;

    let message_id = MessageId::new(message_id_raw.trim().parse()?)?;
    let client = SmsPlanetClient::new(Credentials::new(key, password)?)?;
    let report = client.get_message_status(message_id).await?;

    for (label, value) in report.from.iter() {
        println!("{label}: {value}");
    }
    for recipient in &report.to {
        let fields = recipient
            .iter()
            .map(|(label, value)| format!("{label}={value}"))
            .collect::<Vec<_>>();
        println!("{}", fields.join(", "));
    }

    Ok(())
}

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

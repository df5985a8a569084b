use std::io;

use smsplanet::{Credentials, RequestArgs, SendSms, SmsPlanetClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key = required_env("SMSPLANET_KEY")?;
    let password = required_env("SMSPLANET_PASSWORD")?;
    let sender = required_env("SMSPLANET_FROM")?;
    let recipients = required_env("SMSPLANET_TO")?;
    let message = std::env::var("SMSPLANET_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsplanet example.".to_owned());

    let client = SmsPlanetClient::new(Credentials::new(key, password)?)?;
    let mut args = RequestArgs::new()
        .with("from", sender)
        .with("msg", message)
        .with("to", recipients.split(',').collect::<Vec<_>>());
    if let Ok(date) = std::env::var("SMSPLANET_DATE") {
        args.insert("date", date);
    }
    let request = SendSms::try_from(args)?;

    let message_id = client.send_sms(request).await?;
    println!("message_id: {message_id:?}");

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

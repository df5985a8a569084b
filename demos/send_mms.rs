use std::io;

use smsplanet::{
    Attachment, Credentials, MessageText, RawPhoneNumber, SendMms, SendOptions, SenderName,
    SmsPlanetClient, Title,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let key = required_env("SMSPLANET_KEY")?;
    let password = required_env("SMSPLANET_PASSWORD")?;
    let sender = required_env("SMSPLANET_FROM")?;
    let phone_raw = required_env("SMSPLANET_TO")?;
    let attachments_raw = required_env("SMSPLANET_ATTACHMENTS").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "SMSPLANET_ATTACHMENTS environment variable is required (comma-separated links)",
        )
    })?;
    let message = std::env::var("SMSPLANET_MESSAGE")
        .unwrap_or_else(|_| "Hello from the smsplanet example.".to_owned());

    let attachments = attachments_raw
        .split(',')
        .map(Attachment::new)
        .collect::<Result<Vec<_>, _>>()?;
    let request = SendMms::new(
        SenderName::new(sender)?,
        MessageText::new(message)?,
        vec![RawPhoneNumber::new(phone_raw)?],
        SendOptions::default(),
    )?
    .with_title(Title::new("smsplanet example")?)
    .with_attachments(attachments);

    let client = SmsPlanetClient::new(Credentials::new(key, password)?)?;
    let message_id = client.send_mms(request).await?;
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

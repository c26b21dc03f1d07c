//! Handing artifacts to the mail side.
//!
//! Sending is not done here. [`OutboxDispatcher`] spools each message as a
//! directory holding `envelope.json` and a copy of the attachment, for a mail
//! transfer agent to pick up.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MailConfig;

pub const ENVELOPE_FILE: &str = "envelope.json";

/// Delivers one artifact to a set of recipients.
pub trait Dispatcher {
    fn dispatch(&self, attachment: &Path, recipients: &[String]) -> Result<Receipt>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub message_id: String,
    pub location: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub message_id: String,
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub content_type: String,
    pub relay: Relay,
    pub attachment: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relay {
    pub host: String,
    pub port: u16,
    pub user: String,
}

impl Envelope {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening envelope {path:?}"))?;
        serde_json::from_reader(file).context("Parsing envelope JSON")
    }
}

pub struct OutboxDispatcher {
    outbox: PathBuf,
    mail: MailConfig,
}

impl OutboxDispatcher {
    pub fn new(outbox: impl Into<PathBuf>, mail: MailConfig) -> Self {
        Self {
            outbox: outbox.into(),
            mail,
        }
    }

    fn envelope(&self, message_id: &str, attachment: &str, recipients: &[String]) -> Envelope {
        Envelope {
            message_id: message_id.to_string(),
            from: self.mail.from.clone(),
            to: recipients.to_vec(),
            subject: self.mail.subject.clone(),
            body: self.mail.body.clone(),
            content_type: "text/html".to_string(),
            relay: Relay {
                host: self.mail.host.clone(),
                port: self.mail.port,
                user: self.mail.user.clone(),
            },
            attachment: attachment.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

impl Dispatcher for OutboxDispatcher {
    fn dispatch(&self, attachment: &Path, recipients: &[String]) -> Result<Receipt> {
        if recipients.is_empty() {
            bail!("No recipients to deliver {attachment:?} to");
        }
        let attachment_name = attachment
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("Attachment {attachment:?} has no file name"))?;

        let message_id = Uuid::new_v4().to_string();
        let location = self.outbox.join(&message_id);
        fs::create_dir_all(&location)
            .with_context(|| format!("Creating outbox entry {location:?}"))?;
        let envelope = self.envelope(&message_id, &attachment_name, recipients);
        if let Err(err) = spool(&location, attachment, &envelope) {
            if let Err(cleanup) = fs::remove_dir_all(&location) {
                warn!("Failed to remove incomplete outbox entry {location:?}: {cleanup}");
            }
            return Err(err);
        }

        info!(
            "Spooled message {message_id} for {} recipient(s) in {location:?}",
            recipients.len()
        );
        Ok(Receipt {
            message_id,
            location,
        })
    }
}

/// Fill an outbox entry. `envelope.json` appears only once it is complete.
fn spool(location: &Path, attachment: &Path, envelope: &Envelope) -> Result<()> {
    fs::copy(attachment, location.join(&envelope.attachment))
        .with_context(|| format!("Copying {attachment:?} into {location:?}"))?;

    let staging = location.join(format!("{ENVELOPE_FILE}.tmp"));
    let file =
        File::create(&staging).with_context(|| format!("Creating envelope {staging:?}"))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, envelope).context("Writing envelope JSON")?;
    writer
        .flush()
        .with_context(|| format!("Flushing envelope {staging:?}"))?;
    let envelope_path = location.join(ENVELOPE_FILE);
    fs::rename(&staging, &envelope_path)
        .with_context(|| format!("Publishing envelope {envelope_path:?}"))?;
    Ok(())
}

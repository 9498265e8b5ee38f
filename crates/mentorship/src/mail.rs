//! Shared email dispatch helper
//!
//! Sends a rendered template through the mailer seam, recording the
//! outcome metric and log line. The outcome is never surfaced as an
//! error; callers treat email as a best-effort side effect.

use crate::templates::RenderedEmail;
use grantflow_common::db::models::Profile;
use grantflow_common::{metrics, Mailer, OutgoingEmail, SendOutcome};

pub(crate) async fn send_rendered(mailer: &dyn Mailer, recipient: &Profile, rendered: RenderedEmail) {
    let template = rendered.template;
    let outcome = mailer
        .send(OutgoingEmail {
            to: recipient.email.clone(),
            to_name: Some(recipient.full_name.clone()),
            subject: rendered.subject,
            html: rendered.html,
            text: Some(rendered.text),
            reply_to: None,
        })
        .await;

    metrics::record_email(template, outcome.is_sent());

    match outcome {
        SendOutcome::Sent { message_id } => {
            tracing::info!(
                to = %recipient.email,
                template = template,
                message_id = ?message_id,
                "Email dispatched"
            );
        }
        SendOutcome::Failed { error } => {
            tracing::error!(
                to = %recipient.email,
                template = template,
                error = %error,
                "Email dispatch failed"
            );
        }
    }
}

//! Transactional email templates for the mentorship lifecycle

/// A rendered email body ready to hand to a mailer
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    /// Template name, used for logging and metrics labels
    pub template: &'static str,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Email sent to the mentee when a mentor accepts their request
pub fn accepted_email(mentee_name: &str, mentor_name: &str) -> RenderedEmail {
    RenderedEmail {
        template: "mentorship_accepted",
        subject: format!("{} accepted your mentorship request", mentor_name),
        html: format!(
            "<p>Hi {mentee_name},</p>\
             <p>Good news — <strong>{mentor_name}</strong> has accepted your \
             mentorship request. Your match is now active and you can start \
             scheduling sessions together.</p>\
             <p>The GrantFlow Team</p>"
        ),
        text: format!(
            "Hi {mentee_name},\n\n\
             Good news — {mentor_name} has accepted your mentorship request. \
             Your match is now active and you can start scheduling sessions \
             together.\n\nThe GrantFlow Team"
        ),
    }
}

/// Email sent to the mentee when a mentor declines their request
pub fn rejected_email(mentee_name: &str, mentor_name: &str) -> RenderedEmail {
    RenderedEmail {
        template: "mentorship_rejected",
        subject: "Update on your mentorship request".to_string(),
        html: format!(
            "<p>Hi {mentee_name},</p>\
             <p>{mentor_name} is unable to take on your mentorship request at \
             this time. You can browse the mentor directory and send a request \
             to another mentor whose availability fits.</p>\
             <p>The GrantFlow Team</p>"
        ),
        text: format!(
            "Hi {mentee_name},\n\n\
             {mentor_name} is unable to take on your mentorship request at this \
             time. You can browse the mentor directory and send a request to \
             another mentor whose availability fits.\n\nThe GrantFlow Team"
        ),
    }
}

/// Email sent to the mentee when their mentor logs a session
pub fn session_logged_email(
    mentee_name: &str,
    mentor_name: &str,
    duration_minutes: i32,
) -> RenderedEmail {
    RenderedEmail {
        template: "session_logged",
        subject: format!("{} logged a mentorship session", mentor_name),
        html: format!(
            "<p>Hi {mentee_name},</p>\
             <p><strong>{mentor_name}</strong> logged a {duration_minutes}-minute \
             session on your mentorship match. You can review it from your \
             match page.</p>\
             <p>The GrantFlow Team</p>"
        ),
        text: format!(
            "Hi {mentee_name},\n\n\
             {mentor_name} logged a {duration_minutes}-minute session on your \
             mentorship match. You can review it from your match page.\n\n\
             The GrantFlow Team"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_email_mentions_mentor() {
        let email = accepted_email("Ada", "Tunde");
        assert!(email.subject.contains("Tunde"));
        assert!(email.html.contains("Ada"));
        assert!(email.text.contains("accepted"));
        assert_eq!(email.template, "mentorship_accepted");
    }

    #[test]
    fn test_rejected_email_is_neutral() {
        let email = rejected_email("Ada", "Tunde");
        assert!(!email.subject.to_lowercase().contains("reject"));
        assert!(email.text.contains("unable to take on"));
        assert_eq!(email.template, "mentorship_rejected");
    }

    #[test]
    fn test_session_logged_email_includes_duration() {
        let email = session_logged_email("Ada", "Tunde", 45);
        assert!(email.subject.contains("Tunde"));
        assert!(email.text.contains("45-minute"));
        assert_eq!(email.template, "session_logged");
    }
}

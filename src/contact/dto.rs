use serde::Deserialize;

/// Body of the public contact form.
#[derive(Debug, Deserialize)]
pub struct SubmitContactRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl SubmitContactRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().len() < 2
            || self.phone.trim().is_empty()
            || self.message.trim().len() < 10
            || !crate::auth::services::is_valid_email(self.email.trim())
        {
            return Err("All fields are required.".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SubmitContactRequest {
        SubmitContactRequest {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: "+1 555 0100".into(),
            message: "I would like to know more about the robotics course.".into(),
        }
    }

    #[test]
    fn accepts_complete_form() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_short_message_and_bad_email() {
        let mut form = sample();
        form.message = "hi".into();
        assert!(form.validate().is_err());

        let mut form = sample();
        form.email = "not-an-email".into();
        assert!(form.validate().is_err());
    }
}

mod mime;
mod models;

pub use models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{parse_address, parse_address_list};
    use lettre::message::Mailboxes;

    #[test]
    fn requires_a_recipient() {
        let err = Message::new(
            parse_address("sender@test.com", "from").unwrap(),
            Mailboxes::new(),
            Mailboxes::new(),
            "test",
            "body",
            false,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no address"));
    }

    #[test]
    fn html_flag_selects_content_type() {
        let to = parse_address_list("a@test.com, b@test.com", "to").unwrap();
        let cc = parse_address_list("c@test.com", "cc").unwrap();
        let message = Message::new(
            parse_address("sender@test.com", "from").unwrap(),
            to,
            cc,
            "test",
            "body",
            true,
            Some("filepath.txt".into()),
        )
        .unwrap();

        assert_eq!(message.content_type(), ContentType::Html);
        assert_eq!(message.recipients(), 3);
        assert_eq!(message.attachment(), Some(std::path::Path::new("filepath.txt")));
    }
}

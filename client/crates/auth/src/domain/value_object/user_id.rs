use kernel::id::Id;

pub struct UserMarker;
pub type UserId = Id<UserMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_parse() {
        let user_id = UserId::parse("65f1c0ffee0123456789abcd").unwrap();
        assert_eq!(user_id.as_str(), "65f1c0ffee0123456789abcd");
        assert_eq!(user_id.to_string(), "65f1c0ffee0123456789abcd");
    }

    #[test]
    fn test_user_id_rejects_blank() {
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse(" \t").is_err());
    }
}

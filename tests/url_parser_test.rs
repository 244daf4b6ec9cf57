//! Tests for URL/ID extraction functionality.

use drive_archive::url_parser::extract_id;
use drive_archive::Error;

mod drive_urls {
    use super::*;

    #[test]
    fn shared_drive_root_url() {
        let url = "https://drive.google.com/drive/folders/0AO5ageEAi854Uk9PVA";
        assert_eq!(extract_id(url).unwrap(), "0AO5ageEAi854Uk9PVA");
    }

    #[test]
    fn folder_url_with_user_and_query() {
        let url = "https://drive.google.com/drive/u/1/folders/16DyU1zZSrxuJPchwC2_roOXMk9pNZAmG?usp=sharing";
        assert_eq!(extract_id(url).unwrap(), "16DyU1zZSrxuJPchwC2_roOXMk9pNZAmG");
    }

    #[test]
    fn file_url() {
        let url = "https://drive.google.com/file/d/1abc123XYZ/view?usp=sharing";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn open_url() {
        let url = "http://drive.google.com/open?id=1abc123XYZ";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }
}

mod raw_ids {
    use super::*;

    #[test]
    fn id_with_hyphen_and_underscore() {
        assert_eq!(extract_id("abc-123_XYZ").unwrap(), "abc-123_XYZ");
    }

    #[test]
    fn id_with_whitespace_trimmed() {
        assert_eq!(extract_id("\t1abc123XYZ\n").unwrap(), "1abc123XYZ");
    }
}

mod invalid_inputs {
    use super::*;

    #[test]
    fn empty_or_blank() {
        assert!(extract_id("").is_err());
        assert!(extract_id("   ").is_err());
    }

    #[test]
    fn foreign_or_malformed_url() {
        assert!(extract_id("https://example.com/folder/123").is_err());
        assert!(extract_id("https://drive.google.com/drive/").is_err());
    }

    #[test]
    fn error_keeps_original_input() {
        let err = extract_id("abc/123").unwrap_err();
        assert!(matches!(err, Error::InvalidUrlOrId(ref input) if input == "abc/123"));
    }
}

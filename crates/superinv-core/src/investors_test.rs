use super::*;

fn investor(slug: &str, code: &str) -> InvestorConfig {
    InvestorConfig {
        slug: slug.to_string(),
        name: format!("{slug} capital"),
        source_code: code.to_string(),
        folder: None,
    }
}

fn file(investors: Vec<InvestorConfig>) -> InvestorsFile {
    InvestorsFile { investors }
}

#[test]
fn output_folder_defaults_to_slug() {
    assert_eq!(investor("lilu", "HC").output_folder(), "lilu");
}

#[test]
fn output_folder_uses_override() {
    let mut i = investor("dodgecox", "DODGX");
    i.folder = Some("dodge-cox".to_string());
    assert_eq!(i.output_folder(), "dodge-cox");
}

#[test]
fn parses_minimal_yaml() {
    let yaml = r"
investors:
  - slug: lilu
    name: Li Lu - Himalaya Capital Management
    source_code: HC
  - slug: pabrai
    name: Mohnish Pabrai - Dalal Street
    source_code: PI
    folder: pabrai-dalal
";
    let parsed = parse_investors(yaml).unwrap();
    assert_eq!(parsed.investors.len(), 2);
    assert_eq!(parsed.investors[0].source_code, "HC");
    assert!(parsed.investors[0].folder.is_none());
    assert_eq!(parsed.investors[1].output_folder(), "pabrai-dalal");
    assert_eq!(parsed.find("pabrai").unwrap().name, "Mohnish Pabrai - Dalal Street");
    assert!(parsed.find("missing").is_none());
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = parse_investors("investors: [ {slug: ").unwrap_err();
    assert!(matches!(err, ConfigError::InvestorsFileParse(_)));
}

#[test]
fn rejects_duplicate_slug() {
    let err = validate_investors(&file(vec![investor("lilu", "HC"), investor("lilu", "X")]))
        .unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate investor slug")),
        "got: {err:?}"
    );
}

#[test]
fn rejects_duplicate_folder() {
    let mut second = investor("lilu-2", "X");
    second.folder = Some("lilu".to_string());
    let err = validate_investors(&file(vec![investor("lilu", "HC"), second])).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate output folder")),
        "got: {err:?}"
    );
}

#[test]
fn rejects_uppercase_slug() {
    let err = validate_investors(&file(vec![investor("LiLu", "HC")])).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn rejects_empty_source_code() {
    let err = validate_investors(&file(vec![investor("lilu", "  ")])).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref m) if m.contains("source_code")),
        "got: {err:?}"
    );
}

#[test]
fn rejects_path_like_folder() {
    let mut i = investor("lilu", "HC");
    i.folder = Some("../escape".to_string());
    assert!(validate_investors(&file(vec![i])).is_err());
}

#[test]
fn missing_file_is_io_error() {
    let err = load_investors(Path::new("/definitely/not/here/investors.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::InvestorsFileIo { .. }));
}

#[test]
fn shipped_registry_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/investors.yaml");
    let parsed = load_investors(&path).unwrap();
    assert!(!parsed.investors.is_empty());
}

use semver::Version;

// traditional month names, indexed by release month
const TSUKI_NO_NA: [&str; 12] = [
    "睦月",
    "如月",
    "弥生",
    "卯月",
    "皐月",
    "水無月",
    "文月",
    "葉月",
    "長月",
    "神無月",
    "霜月",
    "師走",
];

pub fn get_version() -> String {
    let semver = env!("CARGO_PKG_VERSION").parse::<Version>();

    if let Ok(semver) = semver {
        let name = TSUKI_NO_NA
            .get(semver.minor.saturating_sub(1) as usize)
            .unwrap_or(&"閏月");

        // vergen emits the literal placeholder when it can't reach git
        if env!("VERGEN_GIT_SHA") == "VERGEN_IDEMPOTENT_OUTPUT" {
            format!("{} - {}", semver, name)
        } else {
            format!("{} - {} [{}]", semver, name, env!("VERGEN_GIT_SHA"))
        }
    } else {
        tracing::warn!("couldn't parse a semver out of Cargo.toml? defaulting to 0.0.0-unknown.");
        String::from("0.0.0-unknown")
    }
}

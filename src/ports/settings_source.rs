/// Port for the configuration lookup capability.
///
/// Values are returned as strings; typed parsing and defaults belong to the
/// config resolver.
pub trait SettingsSource {
    /// Value for a known key, if set.
    fn get(&self, key: &str) -> Option<String>;

    /// Where the values come from, for diagnostics.
    fn origin(&self) -> String;
}

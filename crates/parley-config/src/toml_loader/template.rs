//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# parley configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[backend]
# model = "gemini-1.5-flash"
# base_url = "https://generativelanguage.googleapis.com/v1beta/models"
# max_tokens = 4096          # 1-65536
# temperature = 0.7          # 0.0-2.0
# mode = "stateful"          # stateful, stateless
# connect_timeout_secs = 10  # 1-120
# request_timeout_secs = 120 # 1-600

[prompt]
# instruction = ""           # e.g. "Reply in Portuguese."
# apology = "Sorry, an error occurred while generating the response."

[usage]
# prefer_reported = true     # false = always count words

[storage]
# database = ""              # empty = <data dir>/parley/credentials.db
# mirror = ""                # empty = <data dir>/parley/credentials.env
# mirror_enabled = true

[logging]
# level = "info"             # trace, debug, info, warn, error
# max_logged_chars = 200     # 16-10000
"##
    .to_string()
}

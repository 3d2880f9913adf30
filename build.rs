fn main() {
    // Embed git metadata (commit hash) for /health and `--version` output.
    if let Err(err) = built::write_built_file() {
        panic!("Failed to acquire build-time information: {err}");
    }
}

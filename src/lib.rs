mod macros;

pub mod jive;
pub mod keyword;

/// Parses an LS-DYNA keyword deck and renders it as a Jive data file.
pub fn convert(buffer: &[u8]) -> keyword::Result<String> {
    let model = keyword::parse_bytes(buffer)?;
    jive::render(&model)
}

use smallvec::SmallVec;

use crate::keyword::{Error, Map, Result, Scalar};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cast {
    Int,
    Float,
    Text,
}

impl Cast {
    pub fn apply(self, token: &str) -> Result<Scalar> {
        match self {
            Cast::Int => parse_int(token).map(Scalar::Int),
            Cast::Float => parse_float(token).map(Scalar::Float),
            Cast::Text => Ok(Scalar::Text(token.to_owned())),
        }
    }
}

pub fn parse_int(token: &str) -> Result<i64> {
    token
        .parse()
        .map_err(|e| Error::ParseInt(token.to_owned(), e))
}

pub fn parse_float(token: &str) -> Result<f64> {
    token
        .parse()
        .map_err(|e| Error::ParseFloat(token.to_owned(), e))
}

/// Lazily casts the whitespace separated tokens of `row` against `casts`.
///
/// Tokens and casts are zipped, so a short row yields fewer values and extra
/// tokens are never looked at.
pub fn parse_row<'a>(
    row: &'a str,
    casts: &'a [Cast],
) -> impl Iterator<Item = Result<Scalar>> + 'a {
    casts
        .iter()
        .zip(row.split_whitespace())
        .map(|(cast, token)| cast.apply(token))
}

pub type Values = SmallVec<[Scalar; 10]>;

/// Casts a row eagerly, failing on the first bad token.
pub fn parse_values(row: &str, casts: &[Cast]) -> Result<Values> {
    parse_row(row, casts).collect()
}

/// Parses up to `limit` leading integer tokens.
pub fn parse_ints(row: &str, limit: usize) -> Result<SmallVec<[i64; 10]>> {
    row.split_whitespace().take(limit).map(parse_int).collect()
}

/// Casts a row and names each value. Missing trailing fields are left out of
/// the record.
pub fn parse_record(row: &str, fields: &[(&'static str, Cast)]) -> Result<Map> {
    let mut record = Map::new();
    for (&(name, cast), token) in fields.iter().zip(row.split_whitespace()) {
        record.insert(name, cast.apply(token)?);
    }
    Ok(record)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keyword::Value;

    #[test]
    fn test_parse_row() {
        let casts = [Cast::Int, Cast::Float, Cast::Float, Cast::Text];
        let values = parse_values("12  1.5e3 -2 ABC", &casts).unwrap();
        assert_eq!(
            values.as_slice(),
            &[
                Scalar::Int(12),
                Scalar::Float(1500.),
                Scalar::Float(-2.),
                Scalar::Text("ABC".to_owned())
            ]
        );
    }

    #[test]
    fn short_and_long_rows_zip() {
        assert_eq!(parse_values("1", &[Cast::Int, Cast::Int]).unwrap().len(), 1);
        assert_eq!(parse_values("1 2 3", &[Cast::Int]).unwrap().len(), 1);
    }

    #[test]
    fn bad_token_is_reported() {
        match parse_values("1 x", &[Cast::Int, Cast::Float]) {
            Err(Error::ParseFloat(token, _)) => assert_eq!(token, "x"),
            r => panic!("unexpected {:?}", r),
        }
        assert!(matches!(
            parse_values("1.0", &[Cast::Int]),
            Err(Error::ParseInt(..))
        ));
    }

    #[test]
    fn ints_stop_at_limit() {
        assert_eq!(parse_ints("1 2 3 4", 3).unwrap().as_slice(), &[1, 2, 3]);
        assert!(parse_ints("1 2.5", 3).is_err());
    }

    #[test]
    fn record_names_fields() {
        let fields = [("nsid", Cast::Int), ("cid", Cast::Int), ("dofx", Cast::Int)];
        let record = parse_record("3 1", &fields).unwrap();
        assert_eq!(record.get("nsid"), Some(&Value::from(3i64)));
        assert_eq!(record.get("cid"), Some(&Value::from(1i64)));
        assert!(!record.contains_key("dofx"));
    }
}

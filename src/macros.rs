/// Builds a [`Map`](crate::keyword::Map) from `key => value` pairs, in order.
#[macro_export]
macro_rules! map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut m = $crate::keyword::Map::new();
        $(m.insert($key, $value);)*
        m
    }};
}

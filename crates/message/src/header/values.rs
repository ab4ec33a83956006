/// Conversion of header input into a list of raw header values.
///
/// A single string or number becomes a one element list, sequences keep
/// their order. Values are sanitized later, when they are stored.
pub trait HeaderValues {
    fn into_header_values(self) -> Vec<String>;
}

impl HeaderValues for &str {
    fn into_header_values(self) -> Vec<String> {
        vec![self.to_owned()]
    }
}

impl HeaderValues for String {
    fn into_header_values(self) -> Vec<String> {
        vec![self]
    }
}

impl HeaderValues for &String {
    fn into_header_values(self) -> Vec<String> {
        vec![self.clone()]
    }
}

macro_rules! numeric_header_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HeaderValues for $ty {
                fn into_header_values(self) -> Vec<String> {
                    vec![self.to_string()]
                }
            }
        )*
    };
}

numeric_header_values!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T: HeaderValues> HeaderValues for Vec<T> {
    fn into_header_values(self) -> Vec<String> {
        self.into_iter().flat_map(HeaderValues::into_header_values).collect()
    }
}

impl<T: HeaderValues, const N: usize> HeaderValues for [T; N] {
    fn into_header_values(self) -> Vec<String> {
        self.into_iter().flat_map(HeaderValues::into_header_values).collect()
    }
}

impl<T: HeaderValues + Clone> HeaderValues for &[T] {
    fn into_header_values(self) -> Vec<String> {
        self.iter().cloned().flat_map(HeaderValues::into_header_values).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_become_single_values() {
        assert_eq!("a".into_header_values(), vec!["a"]);
        assert_eq!(String::from("b").into_header_values(), vec!["b"]);
        assert_eq!(69i32.into_header_values(), vec!["69"]);
        assert_eq!(1024u64.into_header_values(), vec!["1024"]);
    }

    #[test]
    fn sequences_keep_order() {
        assert_eq!(["Bam", "Bar"].into_header_values(), vec!["Bam", "Bar"]);
        assert_eq!(vec![1u8, 2, 3].into_header_values(), vec!["1", "2", "3"]);

        let values = [String::from("x"), String::from("y")];
        assert_eq!(values[..].into_header_values(), vec!["x", "y"]);
    }
}

//! Registration names shared by the converter and validator registries.

/// One or several names to register an entry under.
///
/// Implemented for a single name and for collections of names, so that
/// `register("int", ..)` and `register(["integer", "int"], ..)` both work.
pub trait RegistryNames {
    /// Returns the names as owned strings.
    fn into_names(self) -> Vec<String>;
}

impl RegistryNames for &str {
    fn into_names(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl RegistryNames for String {
    fn into_names(self) -> Vec<String> {
        vec![self]
    }
}

impl RegistryNames for &[&str] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl<const N: usize> RegistryNames for [&str; N] {
    fn into_names(self) -> Vec<String> {
        self.iter().map(ToString::to_string).collect()
    }
}

impl RegistryNames for Vec<String> {
    fn into_names(self) -> Vec<String> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_many() {
        assert_eq!("int".into_names(), vec!["int"]);
        assert_eq!(["integer", "int"].into_names(), vec!["integer", "int"]);
        let slice: &[&str] = &["a", "b"];
        assert_eq!(slice.into_names(), vec!["a", "b"]);
    }
}

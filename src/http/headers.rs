/// Ordered collection of request header fields.
///
/// Fields are kept in the order they were read off the wire, as the exact
/// bytes the client sent. Lookup walks the table backwards so that, for a name
/// that appears more than once, the value of the last occurrence wins. Names
/// are compared ASCII case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTable {
    fields: Vec<(Vec<u8>, Vec<u8>)>,
}

impl HeaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field. Existing fields with the same name are kept.
    pub fn add(&mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Returns the value of the most recently added field named `name`.
    ///
    /// # Example
    ///
    /// ```
    /// # use warden::http::headers::HeaderTable;
    /// let mut headers = HeaderTable::new();
    /// headers.add("X-Tag", "a");
    /// headers.add("x-tag", b"caf\xe9".as_slice());
    /// assert_eq!(headers.lookup("X-TAG"), Some(&b"caf\xe9"[..]));
    /// assert_eq!(headers.lookup("Missing"), None);
    /// ```
    pub fn lookup(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.as_bytes()))
            .map(|(_, v)| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates fields in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.fields.iter().map(|(n, v)| (n.as_slice(), v.as_slice()))
    }
}

impl<N, V> FromIterator<(N, V)> for HeaderTable
where
    N: Into<Vec<u8>>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut table = HeaderTable::new();
        for (name, value) in iter {
            table.add(name, value);
        }
        table
    }
}

use serde::{Deserialize, Serialize};

/// The label shown for transactions whose category no longer exists.
pub const UNCATEGORIZED: &str = "Sin Categoría";

/// The categories created the first time the ledger is opened.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Comida",
    "Transporte",
    "Alojamiento",
    "Ocio",
    "Salud",
    "Sueldo",
];

/// A user-defined label used to group transactions.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub(crate) id: u64,
    pub(crate) name: String,
}

impl Category {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive name comparison, used for uniqueness checks.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The category list, in insertion order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Categories {
    data: Vec<Category>,
}

impl Categories {
    pub fn new(data: Vec<Category>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[Category] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, id: u64) -> Option<&Category> {
        self.data.iter().find(|c| c.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: u64) -> Option<&mut Category> {
        self.data.iter_mut().find(|c| c.id == id)
    }

    /// Finds a category with the given name, ignoring case, optionally skipping one ID.
    pub fn find_by_name(&self, name: &str, except: Option<u64>) -> Option<&Category> {
        self.data
            .iter()
            .filter(|c| Some(c.id) != except)
            .find(|c| c.has_name(name))
    }

    /// Resolves a category ID to its name, or the placeholder label if it does not exist.
    pub fn name_of(&self, id: u64) -> &str {
        self.get(id).map(Category::name).unwrap_or(UNCATEGORIZED)
    }

    pub(crate) fn push(&mut self, category: Category) {
        self.data.push(category);
    }

    pub(crate) fn remove(&mut self, id: u64) -> Option<Category> {
        let ix = self.data.iter().position(|c| c.id == id)?;
        Some(self.data.remove(ix))
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.data.iter().map(|c| c.id)
    }
}

impl<'a> IntoIterator for &'a Categories {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Categories {
        Categories::new(vec![Category::new(1, "Comida"), Category::new(2, "Ocio")])
    }

    #[test]
    fn test_name_of_dangling_reference() {
        let categories = sample();
        assert_eq!(categories.name_of(2), "Ocio");
        assert_eq!(categories.name_of(99), UNCATEGORIZED);
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        let categories = sample();
        assert_eq!(categories.find_by_name("COMIDA", None).unwrap().id(), 1);
        assert!(categories.find_by_name("comida", Some(1)).is_none());
        assert!(categories.find_by_name("Salud", None).is_none());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Comida"},{"id":2,"name":"Ocio"}]"#
        );
    }

    #[test]
    fn test_remove() {
        let mut categories = sample();
        assert_eq!(categories.remove(1).unwrap().name(), "Comida");
        assert!(categories.remove(1).is_none());
        assert_eq!(categories.len(), 1);
    }
}

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::{LeafError, Result, Rgbw};

/// Boxed event test used by a [`Category`].
pub type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// Position of a category within its [`CategorySet`]. Lower ids are tried
/// first when classifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CategoryId(usize);

impl CategoryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Named bucket with a display colour and the predicate that claims events.
pub struct Category<E> {
    name: String,
    color: Rgbw,
    predicate: Predicate<E>,
}

impl<E> Category<E> {
    pub fn new(
        name: impl Into<String>,
        color: Rgbw,
        predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            color,
            predicate: Box::new(predicate),
        }
    }

    /// Category that accepts every event. Belongs at the end of a set.
    pub fn catch_all(name: impl Into<String>, color: Rgbw) -> Self {
        Self::new(name, color, |_| true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Rgbw {
        self.color
    }

    pub fn matches(&self, event: &E) -> bool {
        (self.predicate)(event)
    }
}

impl<E> fmt::Debug for Category<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field("color", &self.color)
            .finish()
    }
}

/// Ordered, immutable list of categories plus the optional category that
/// takes the whole panel bank when a batch has no events.
///
/// Match order and display priority are separate: `priorities[i]` ranks
/// category `i` when equal panel counts have to be ordered, lower first. By
/// default the rank is the match position.
pub struct CategorySet<E> {
    categories: Vec<Category<E>>,
    priorities: Vec<usize>,
    fallback: Option<CategoryId>,
}

impl<E> CategorySet<E> {
    /// Builds a set in match order. Names must be unique.
    pub fn new(categories: Vec<Category<E>>) -> Result<Self> {
        if categories.is_empty() {
            return Err(LeafError::Config("category set is empty".into()));
        }

        for (index, category) in categories.iter().enumerate() {
            if categories[..index]
                .iter()
                .any(|earlier| earlier.name == category.name)
            {
                return Err(LeafError::Config(format!(
                    "category `{}` is defined twice",
                    category.name
                )));
            }
        }

        Ok(Self {
            priorities: (0..categories.len()).collect(),
            categories,
            fallback: None,
        })
    }

    /// Ranks categories for tie-breaks, highest priority first. Categories
    /// not named keep their match order behind the named ones.
    pub fn with_priority(mut self, names: &[&str]) -> Result<Self> {
        let mut ranked = Vec::with_capacity(self.categories.len());
        for name in names {
            let id = self
                .find(name)
                .ok_or_else(|| LeafError::Config(format!("unknown category `{name}` in priority")))?;
            if ranked.contains(&id.0) {
                return Err(LeafError::Config(format!(
                    "category `{name}` is ranked twice"
                )));
            }
            ranked.push(id.0);
        }
        let unranked: Vec<usize> = (0..self.categories.len())
            .filter(|index| !ranked.contains(index))
            .collect();
        ranked.extend(unranked);

        for (rank, index) in ranked.into_iter().enumerate() {
            self.priorities[index] = rank;
        }
        Ok(self)
    }

    /// Names the category that receives every panel for empty batches.
    pub fn with_fallback(mut self, name: &str) -> Result<Self> {
        let id = self
            .find(name)
            .ok_or_else(|| LeafError::Config(format!("unknown fallback category `{name}`")))?;
        self.fallback = Some(id);
        Ok(self)
    }

    /// Replaces the colours of the named categories.
    pub fn recolor(&mut self, colors: &BTreeMap<String, Rgbw>) -> Result<()> {
        for (name, color) in colors {
            let id = self
                .find(name)
                .ok_or_else(|| LeafError::Config(format!("unknown category `{name}` in colours")))?;
            self.categories[id.0].color = *color;
        }
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<CategoryId> {
        self.categories
            .iter()
            .position(|category| category.name == name)
            .map(CategoryId)
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category<E>> {
        self.categories.get(id.0)
    }

    pub fn fallback(&self) -> Option<CategoryId> {
        self.fallback
    }

    /// Tie-break rank of `id`; lower wins.
    pub fn priority(&self, id: CategoryId) -> usize {
        self.priorities.get(id.0).copied().unwrap_or(usize::MAX)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &Category<E>)> {
        self.categories
            .iter()
            .enumerate()
            .map(|(index, category)| (CategoryId(index), category))
    }

    /// First category, in match order, whose predicate accepts `event`.
    pub fn first_match(&self, event: &E) -> Option<CategoryId> {
        self.categories
            .iter()
            .position(|category| category.matches(event))
            .map(CategoryId)
    }
}

impl<E> fmt::Debug for CategorySet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategorySet")
            .field("categories", &self.categories)
            .field("priorities", &self.priorities)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Event count for one category in one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub id: CategoryId,
    pub priority: usize,
    pub name: String,
    pub color: Rgbw,
    pub events: usize,
}

/// Per-category event counts for one batch, in match order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    tallies: Vec<CategoryTally>,
    fallback: Option<CategoryId>,
}

impl ClassificationResult {
    pub fn tallies(&self) -> &[CategoryTally] {
        &self.tallies
    }

    pub fn fallback(&self) -> Option<CategoryId> {
        self.fallback
    }

    /// Total number of classified events.
    pub fn total(&self) -> usize {
        self.tallies.iter().map(|tally| tally.events).sum()
    }

    pub fn count(&self, id: CategoryId) -> usize {
        self.tallies.get(id.0).map_or(0, |tally| tally.events)
    }

    pub fn count_of(&self, name: &str) -> Option<usize> {
        self.tallies
            .iter()
            .find(|tally| tally.name == name)
            .map(|tally| tally.events)
    }
}

/// Counts every event against the first category that accepts it.
pub fn classify<E>(events: &[E], categories: &CategorySet<E>) -> Result<ClassificationResult> {
    let mut counts = vec![0usize; categories.len()];

    for (index, event) in events.iter().enumerate() {
        let id = categories
            .first_match(event)
            .ok_or(LeafError::UnclassifiedEvent { index })?;
        counts[id.0] += 1;
    }

    let tallies = categories
        .iter()
        .zip(counts)
        .map(|((id, category), events)| CategoryTally {
            id,
            priority: categories.priority(id),
            name: category.name.clone(),
            color: category.color,
            events,
        })
        .collect();

    Ok(ClassificationResult {
        tallies,
        fallback: categories.fallback,
    })
}

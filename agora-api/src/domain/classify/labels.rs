//! The label space of the arXiv classification model.
//!
//! Order matters: the model's logit at index `i` scores `CATEGORIES[i]`.

/// One arXiv subject category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// arXiv taxonomy code, e.g. `cs.AI`.
    pub code: &'static str,
    /// Human-readable description returned to API clients.
    pub description: &'static str,
}

pub const CATEGORY_COUNT: usize = 11;

pub const CATEGORIES: [Category; CATEGORY_COUNT] = [
    Category {
        code: "math.AC",
        description: "Math: Commutative Algebra",
    },
    Category {
        code: "cs.CV",
        description: "CS: Computer Vision and Pattern Recognition",
    },
    Category {
        code: "cs.AI",
        description: "CS: Artificial Intelligence",
    },
    Category {
        code: "cs.SY",
        description: "CS: Systems and Control",
    },
    Category {
        code: "math.GR",
        description: "Math: Group Theory",
    },
    Category {
        code: "cs.DS",
        description: "CS: Data Structures and Algorithms",
    },
    Category {
        code: "cs.CE",
        description: "CS: Computer Engineering, Finance, Science",
    },
    Category {
        code: "cs.PL",
        description: "CS: Programming Languages",
    },
    Category {
        code: "cs.IT",
        description: "CS: Information Theory",
    },
    Category {
        code: "cs.NE",
        description: "CS: Neural and Evolutionary Computing",
    },
    Category {
        code: "math.ST",
        description: "Math: Statistics Theory",
    },
];

/// Category for a model label index.
pub fn category(index: usize) -> Option<&'static Category> {
    CATEGORIES.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eleven_categories() {
        assert_eq!(CATEGORIES.len(), CATEGORY_COUNT);
    }

    #[test]
    fn lookup_by_index() {
        assert_eq!(category(2).unwrap().code, "cs.AI");
        assert_eq!(
            category(10).unwrap().description,
            "Math: Statistics Theory"
        );
        assert!(category(CATEGORY_COUNT).is_none());
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in CATEGORIES.iter().enumerate() {
            for b in &CATEGORIES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }
}

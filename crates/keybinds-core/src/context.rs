/// Gameplay vs. other-context classification.
///
/// The hooked function runs for every input-handling object in the
/// engine, including the console and menus. Only the object whose
/// class is `WillowGame.WillowUIInteraction` is handling gameplay
/// input, so the classifier compares the invoker's class identity
/// against that reference class.
use std::sync::OnceLock;

use log::warn;

/// Object path of the class that handles interactive-gameplay input.
pub const GAMEPLAY_INPUT_CLASS: &str = "WillowGame.WillowUIInteraction";

/// Opaque runtime class identity (the address of a class object).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

impl ClassId {
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }
}

/// Which logical input-handling mode is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    Gameplay,
    Other,
}

/// Class-metadata lookup, supplied by the host integration.
///
/// Returns `None` when the named class is not (yet) loaded.
pub trait ClassResolver: Send + Sync {
    fn find_class(&self, path: &str) -> Option<ClassId>;
}

/// Classifies the invoking object of an input event.
///
/// The reference class is looked up on first use, past module
/// initialization (it needs a running host with loaded type metadata),
/// and the result is cached for the process lifetime. A failed lookup
/// is cached too and degrades every classification to `Other`.
pub struct ContextClassifier {
    resolver: Box<dyn ClassResolver>,
    gameplay_class: OnceLock<Option<ClassId>>,
}

impl ContextClassifier {
    pub fn new(resolver: Box<dyn ClassResolver>) -> Self {
        Self {
            resolver,
            gameplay_class: OnceLock::new(),
        }
    }

    pub fn classify(&self, invoker_class: ClassId) -> InputContext {
        let reference = self.gameplay_class.get_or_init(|| {
            let found = self.resolver.find_class(GAMEPLAY_INPUT_CLASS);
            if found.is_none() {
                warn!(
                    "could not resolve {}; classifying all input as non-gameplay",
                    GAMEPLAY_INPUT_CLASS
                );
            }
            found
        });
        match reference {
            Some(class) if *class == invoker_class => InputContext::Gameplay,
            _ => InputContext::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Resolver backed by a fixed class table, counting lookups.
    struct TableResolver {
        gameplay: Option<ClassId>,
        lookups: Arc<AtomicUsize>,
    }

    impl ClassResolver for TableResolver {
        fn find_class(&self, path: &str) -> Option<ClassId> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if path == GAMEPLAY_INPUT_CLASS {
                self.gameplay
            } else {
                None
            }
        }
    }

    fn classifier_with(
        gameplay: Option<ClassId>,
    ) -> (ContextClassifier, Arc<AtomicUsize>) {
        let lookups = Arc::new(AtomicUsize::new(0));
        let classifier = ContextClassifier::new(Box::new(TableResolver {
            gameplay,
            lookups: lookups.clone(),
        }));
        (classifier, lookups)
    }

    #[test]
    fn matching_class_is_gameplay() {
        let gameplay = ClassId::from_addr(0x1000);
        let (classifier, _) = classifier_with(Some(gameplay));
        assert_eq!(classifier.classify(gameplay), InputContext::Gameplay);
    }

    #[test]
    fn other_class_is_other() {
        let gameplay = ClassId::from_addr(0x1000);
        let console = ClassId::from_addr(0x2000);
        let (classifier, _) = classifier_with(Some(gameplay));
        assert_eq!(classifier.classify(console), InputContext::Other);
    }

    #[test]
    fn lookup_happens_once() {
        let gameplay = ClassId::from_addr(0x1000);
        let (classifier, lookups) = classifier_with(Some(gameplay));
        classifier.classify(gameplay);
        classifier.classify(gameplay);
        classifier.classify(ClassId::from_addr(0x2000));
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_lookup_degrades_to_other_and_is_cached() {
        let (classifier, lookups) = classifier_with(None);
        let invoker = ClassId::from_addr(0x3000);
        assert_eq!(classifier.classify(invoker), InputContext::Other);
        assert_eq!(classifier.classify(invoker), InputContext::Other);
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }
}

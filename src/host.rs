//! Host object detection supplied by the embedding environment.

use crate::value::Object;

/// Decides whether an object is provided by the host environment (a
/// platform element, a native handle) and therefore opaque.
///
/// Host objects are only ever equal to themselves. Without a detector
/// installed they are compared like any plain object.
pub trait HostDetector: Send + Sync {
    fn is_host_object(&self, object: &Object) -> bool;
}

impl<F> HostDetector for F
where
    F: Fn(&Object) -> bool + Send + Sync,
{
    fn is_host_object(&self, object: &Object) -> bool {
        self(object)
    }
}

/// Treats objects whose class name is in a fixed list as host objects.
#[derive(Debug, Clone, Default)]
pub struct HostClasses {
    classes: Vec<String>,
}

impl HostClasses {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

impl HostDetector for HostClasses {
    fn is_host_object(&self, object: &Object) -> bool {
        let class = object.class_name();
        self.classes.iter().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ObjectKind;

    #[test]
    fn test_closure_detector() {
        let detector = |object: &Object| object.class_name().starts_with("HTML");
        let div = Object::new(ObjectKind::Plain).with_class("HTMLDivElement");
        let plain = Object::new(ObjectKind::Plain);
        assert!(detector.is_host_object(&div));
        assert!(!detector.is_host_object(&plain));
    }

    #[test]
    fn test_host_classes() {
        let detector = HostClasses::new(["HTMLDivElement", "HTMLSpanElement"]);
        let span = Object::new(ObjectKind::Plain).with_class("HTMLSpanElement");
        let date = Object::new(ObjectKind::Date(0.0));
        assert!(detector.is_host_object(&span));
        assert!(!detector.is_host_object(&date));
    }
}

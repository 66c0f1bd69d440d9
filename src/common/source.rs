use std::{
    path::{Path, PathBuf},
    rc::Rc,
};

/// `Source` represents some literal source code,
/// whether typed into a session, handed over by a host,
/// or one of the bootstrap definitions.
/// It's essentially a string with a path, the path
/// serving as the source's name. Sources without a
/// path point to `./source`.
#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: PathBuf,
}

impl Source {
    /// Creates a new `Source` given both an `&str` and a `Path`.
    /// The path is only used as a name when reporting errors.
    pub fn new(source: &str, path: &Path) -> Rc<Source> {
        Rc::new(Source {
            contents: source.to_string(),
            path: path.to_owned(),
        })
    }

    /// Build an anonymous `Source` containing just a string.
    /// Note that this source will point towards `./source`.
    pub fn source(source: &str) -> Rc<Source> {
        Source::new(source, &PathBuf::from("./source"))
    }
}

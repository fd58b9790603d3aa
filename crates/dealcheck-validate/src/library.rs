//! Canonical template files on disk.

use std::path::{Path, PathBuf};

use dealcheck_core::{CheckError, Rules, Template};
use tracing::debug;

/// A directory of canonical template texts, named by [`Rules`].
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    dir: PathBuf,
}

impl TemplateLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The library at the rules' configured default directory.
    pub fn from_rules(rules: &Rules) -> Self {
        Self::new(rules.template_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the canonical text of `template` is expected.
    pub fn base_path(&self, rules: &Rules, template: &Template) -> Result<PathBuf, CheckError> {
        Ok(self.dir.join(&rules.template(template)?.base_file))
    }

    /// Read the canonical text of `template`.
    ///
    /// An unrecognized template is an input error; a missing file is a
    /// resource error naming the path that was tried.
    pub fn load(&self, rules: &Rules, template: &Template) -> Result<String, CheckError> {
        let path = self.base_path(rules, template)?;
        if !path.is_file() {
            return Err(CheckError::TemplateNotFound { path });
        }
        let text = std::fs::read_to_string(&path)?;
        debug!(template = %template, path = %path.display(), bytes = text.len(), "loaded canonical template");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealcheck_core::ErrorKind;

    #[test]
    fn loads_base_file_for_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("modelo_novo_base.txt"), "1. Objeto\n").unwrap();

        let library = TemplateLibrary::new(dir.path());
        let text = library.load(&Rules::default(), &Template::new("novo")).unwrap();
        assert_eq!(text, "1. Objeto\n");
    }

    #[test]
    fn missing_file_is_a_resource_error() {
        let dir = tempfile::tempdir().unwrap();
        let library = TemplateLibrary::new(dir.path());

        let err = library
            .load(&Rules::default(), &Template::new("antigo_v13"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Resource);
        assert!(err.to_string().contains("modelo_antigo_base.txt"));
    }

    #[test]
    fn unknown_template_is_an_input_error() {
        let library = TemplateLibrary::new("/nonexistent");
        let err = library
            .load(&Rules::default(), &Template::unknown())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn default_directory_comes_from_rules() {
        let library = TemplateLibrary::from_rules(&Rules::default());
        assert_eq!(library.dir(), Path::new("templates"));
        let path = library
            .base_path(&Rules::default(), &Template::new("novo"))
            .unwrap();
        assert_eq!(path, Path::new("templates/modelo_novo_base.txt"));
    }
}

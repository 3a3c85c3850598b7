//! Comment-widget providers and their script recipes.
//!
//! Each provider reads its container's data attributes and produces an
//! [`Activation`]: page globals to set plus script tags to inject. Building
//! the plan is pure; [`Provider::activate`] applies it to a document.

#[cfg(test)]
#[path = "providers_test.rs"]
mod providers_test;

use crate::consts::{
    CUSDIS_LANG_URL_PREFIX, CUSDIS_SCRIPT_URL, DISQUS_SHORTNAME_GLOBAL, GISCUS_SCRIPT_URL, LAZY_LOAD_ATTRIBUTE,
    UTTERANCES_SCRIPT_URL,
};
use crate::dom::{Document, DomError, Placement, ScriptTag};

/// Utterances takes plain attribute names; the container carries `data-`
/// prefixed ones.
const UTTERANCES_ATTRIBUTES: [(&str, &str); 4] = [
    ("data-repo", "repo"),
    ("data-issue-term", "issue-term"),
    ("data-theme", "theme"),
    ("data-label", "label"),
];

/// Errors that abort one provider's activation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    #[error("Disqus shortname not provided")]
    MissingShortname,
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// Supported comment systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Cusdis,
    Disqus,
    Giscus,
    Utterances,
}

impl Provider {
    pub const ALL: [Self; 4] = [Self::Cusdis, Self::Disqus, Self::Giscus, Self::Utterances];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cusdis => "Cusdis",
            Self::Disqus => "Disqus",
            Self::Giscus => "Giscus",
            Self::Utterances => "Utterances",
        }
    }

    /// Id of the element the layout renders for this provider.
    #[must_use]
    pub fn container_id(self) -> &'static str {
        match self {
            Self::Cusdis => "cusdis_thread",
            Self::Disqus => "disqus_thread",
            Self::Giscus => "giscus_thread",
            Self::Utterances => "utterances_thread",
        }
    }

    /// Build the activation plan from the container's attributes.
    ///
    /// # Errors
    ///
    /// Returns [`ActivationError::MissingShortname`] for a Disqus container
    /// without a non-empty `data-shortname`.
    pub fn plan(self, attributes: &[(String, String)]) -> Result<Activation, ActivationError> {
        let get = |name: &str| {
            attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
                .filter(|v| !v.is_empty())
        };

        let mut plan = Activation::default();
        match self {
            Self::Cusdis => {
                if let Some(lang) = get("data-lang") {
                    plan.inject(Placement::Body, ScriptTag::asynchronous(format!("{CUSDIS_LANG_URL_PREFIX}{lang}.js")));
                }
                plan.inject(Placement::Body, ScriptTag::asynchronous(CUSDIS_SCRIPT_URL));
            }
            Self::Disqus => {
                let shortname = get("data-shortname").ok_or(ActivationError::MissingShortname)?;
                plan.globals.push((DISQUS_SHORTNAME_GLOBAL, shortname.to_owned()));
                plan.inject(
                    Placement::HeadOrBody,
                    ScriptTag::asynchronous(format!("//{shortname}.disqus.com/embed.js")).with_type("text/javascript"),
                );
            }
            Self::Giscus => {
                let mut script = ScriptTag::asynchronous(GISCUS_SCRIPT_URL).with_cross_origin("anonymous");
                for (name, value) in attributes {
                    if name.starts_with("data-") && name != LAZY_LOAD_ATTRIBUTE {
                        script.set_attribute(name.as_str(), value.as_str());
                    }
                }
                plan.inject(Placement::Container, script);
            }
            Self::Utterances => {
                let mut script = ScriptTag::asynchronous(UTTERANCES_SCRIPT_URL).with_cross_origin("anonymous");
                for (from, to) in UTTERANCES_ATTRIBUTES {
                    if let Some(value) = get(from) {
                        script.set_attribute(to, value);
                    }
                }
                plan.inject(Placement::Container, script);
            }
        }
        Ok(plan)
    }

    /// Activate this provider inside `container`.
    ///
    /// # Errors
    ///
    /// Returns the planning error, or the first DOM failure while applying the
    /// plan. Globals set before a failed script injection stay set.
    pub fn activate<D: Document>(self, document: &D, container: &D::Element) -> Result<(), ActivationError> {
        let plan = self.plan(&document.attributes(container))?;
        plan.apply(document, container)
    }
}

/// Side effects of activating one provider, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activation {
    /// Page globals to set before any script loads.
    pub globals: Vec<(&'static str, String)>,
    pub scripts: Vec<(Placement, ScriptTag)>,
}

impl Activation {
    fn inject(&mut self, placement: Placement, script: ScriptTag) {
        self.scripts.push((placement, script));
    }

    /// Write the globals, then append the scripts in order.
    ///
    /// # Errors
    ///
    /// Stops at the first DOM failure.
    pub fn apply<D: Document>(&self, document: &D, container: &D::Element) -> Result<(), ActivationError> {
        for (name, value) in &self.globals {
            document.set_global(name, value)?;
        }
        for (placement, script) in &self.scripts {
            document.append_script(*placement, container, script)?;
        }
        Ok(())
    }
}

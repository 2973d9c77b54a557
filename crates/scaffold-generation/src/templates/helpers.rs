//! Case-conversion helpers available inside templates
//!
//! `{{snake_case name}}`, `{{kebab_case name}}`, `{{pascal_case name}}`,
//! `{{camel_case name}}`, `{{upper_case name}}` and `{{lower_case name}}`.

use handlebars::{handlebars_helper, Handlebars};
use serde::{Deserialize, Serialize};

/// Represents a case transformation for placeholder values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseTransform {
    /// PascalCase (e.g., MyProject)
    PascalCase,
    /// camelCase (e.g., myProject)
    CamelCase,
    /// snake_case (e.g., my_project)
    SnakeCase,
    /// kebab-case (e.g., my-project)
    KebabCase,
    /// UPPERCASE (e.g., MY_PROJECT)
    UpperCase,
    /// lowercase (e.g., myproject)
    LowerCase,
}

impl CaseTransform {
    /// Every transform, in helper registration order
    pub const ALL: [CaseTransform; 6] = [
        CaseTransform::PascalCase,
        CaseTransform::CamelCase,
        CaseTransform::SnakeCase,
        CaseTransform::KebabCase,
        CaseTransform::UpperCase,
        CaseTransform::LowerCase,
    ];

    /// Apply case transformation to a string
    pub fn apply(&self, input: &str) -> String {
        use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};

        match self {
            CaseTransform::PascalCase => input.to_pascal_case(),
            CaseTransform::CamelCase => input.to_lower_camel_case(),
            CaseTransform::SnakeCase => input.to_snake_case(),
            CaseTransform::KebabCase => input.to_kebab_case(),
            CaseTransform::UpperCase => input.to_shouty_snake_case(),
            CaseTransform::LowerCase => input.to_lowercase(),
        }
    }

    /// Name the helper is registered under
    pub fn helper_name(&self) -> &'static str {
        match self {
            CaseTransform::PascalCase => "pascal_case",
            CaseTransform::CamelCase => "camel_case",
            CaseTransform::SnakeCase => "snake_case",
            CaseTransform::KebabCase => "kebab_case",
            CaseTransform::UpperCase => "upper_case",
            CaseTransform::LowerCase => "lower_case",
        }
    }
}

handlebars_helper!(pascal_case: |s: str| CaseTransform::PascalCase.apply(s));
handlebars_helper!(camel_case: |s: str| CaseTransform::CamelCase.apply(s));
handlebars_helper!(snake_case: |s: str| CaseTransform::SnakeCase.apply(s));
handlebars_helper!(kebab_case: |s: str| CaseTransform::KebabCase.apply(s));
handlebars_helper!(upper_case: |s: str| CaseTransform::UpperCase.apply(s));
handlebars_helper!(lower_case: |s: str| CaseTransform::LowerCase.apply(s));

/// Register every case helper on `registry`
pub fn register_case_helpers(registry: &mut Handlebars<'_>) {
    registry.register_helper(CaseTransform::PascalCase.helper_name(), Box::new(pascal_case));
    registry.register_helper(CaseTransform::CamelCase.helper_name(), Box::new(camel_case));
    registry.register_helper(CaseTransform::SnakeCase.helper_name(), Box::new(snake_case));
    registry.register_helper(CaseTransform::KebabCase.helper_name(), Box::new(kebab_case));
    registry.register_helper(CaseTransform::UpperCase.helper_name(), Box::new(upper_case));
    registry.register_helper(CaseTransform::LowerCase.helper_name(), Box::new(lower_case));
}

//! Which linkage types are legal between two kinds of configuration.

use crate::core::{LinkageType, OutputType};

/// Whether a `dependent` configuration may depend on a `dependency` with `linkage`.
///
/// Applications can never be depended on. Runtime-loaded modules can only be
/// loaded at runtime by an application. Libraries accept the SWC linkage values.
pub fn is_linkage_legal(dependent: OutputType, dependency: OutputType, linkage: LinkageType) -> bool {
    match dependency {
        OutputType::Application => false,
        OutputType::RuntimeLoadedModule => {
            dependent == OutputType::Application && linkage == LinkageType::LoadInRuntime
        }
        OutputType::Library => linkage.is_swc_linkage(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUTS: [OutputType; 3] = [
        OutputType::Application,
        OutputType::Library,
        OutputType::RuntimeLoadedModule,
    ];

    const LINKAGES: [LinkageType; 6] = [
        LinkageType::Default,
        LinkageType::Merged,
        LinkageType::Rsl,
        LinkageType::External,
        LinkageType::Include,
        LinkageType::LoadInRuntime,
    ];

    #[test]
    fn test_application_dependency_always_illegal() {
        for dependent in OUTPUTS {
            for linkage in LINKAGES {
                assert!(!is_linkage_legal(dependent, OutputType::Application, linkage));
            }
        }
    }

    #[test]
    fn test_rlm_only_loaded_at_runtime_by_apps() {
        for dependent in OUTPUTS {
            assert_eq!(
                is_linkage_legal(dependent, OutputType::RuntimeLoadedModule, LinkageType::LoadInRuntime),
                dependent == OutputType::Application
            );
        }
        assert!(!is_linkage_legal(
            OutputType::Application,
            OutputType::RuntimeLoadedModule,
            LinkageType::Merged
        ));
    }

    #[test]
    fn test_library_accepts_swc_linkage() {
        for dependent in OUTPUTS {
            assert!(!is_linkage_legal(dependent, OutputType::Library, LinkageType::LoadInRuntime));
            for linkage in LinkageType::SWC_LINKAGE_VALUES {
                assert!(is_linkage_legal(dependent, OutputType::Library, linkage));
            }
        }
    }
}

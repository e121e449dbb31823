//! AIR packaging option checks.

use crate::core::packaging::{PackagingOptions, PackagingPlatform};
use crate::util::fs::{is_unset, to_slash};
use crate::validate::problem::{PackagingField, Problem};

/// Check one platform's packaging options.
pub fn validate_packaging(packaging: PackagingOptions<'_>, emit: &mut dyn FnMut(Problem)) {
    let platform = packaging.platform();
    let options = packaging.options();
    let device = platform.device_label();
    let problem = |message: String, code: &'static str, field: PackagingField| {
        Problem::packaging(platform, message, code, field)
    };

    if !options.use_generated_descriptor {
        let descriptor = &options.custom_descriptor_path;
        if is_unset(descriptor) {
            emit(problem(
                format!("Custom application descriptor is not set for {}", device),
                "custom.descriptor.not.set",
                PackagingField::CustomDescriptor,
            ));
        } else if !descriptor.is_file() {
            emit(problem(
                format!(
                    "Custom application descriptor for {} not found: {}",
                    device,
                    descriptor.display()
                ),
                "custom.descriptor.not.found",
                PackagingField::CustomDescriptor,
            ));
        }
    }

    if options.package_file_name.is_empty() {
        emit(problem(
            format!("Package file name is not set for {}", device),
            "package.file.name.not.set",
            PackagingField::PackageFileName,
        ));
    }

    for entry in &options.files_to_package {
        let rel_path = entry.path_in_package.strip_prefix('/').unwrap_or(&entry.path_in_package);

        if is_unset(&entry.file_path) {
            emit(problem(
                format!("Empty file name in the list of files to package for {}", device),
                "packaging.options.empty.file.name",
                PackagingField::FilesToPackage,
            ));
            continue;
        }

        let exists = entry.file_path.exists();
        if !exists {
            emit(problem(
                format!(
                    "File to package for {} not found: {}",
                    device,
                    entry.file_path.display()
                ),
                "packaging.options.file.not.found",
                PackagingField::FilesToPackage,
            ));
        }

        if rel_path.is_empty() {
            emit(problem(
                format!("Empty relative path in the list of files to package for {}", device),
                "packaging.options.empty.relative.path",
                PackagingField::FilesToPackage,
            ));
        }

        if exists
            && entry.file_path.is_dir()
            && !to_slash(&entry.file_path).ends_with(&format!("/{}", rel_path))
        {
            emit(problem(
                format!(
                    "Relative path in package for folder must match the folder name ({}): {}",
                    device, rel_path
                ),
                "packaging.options.relative.path.not.matches",
                PackagingField::FilesToPackage,
            ));
        }
    }

    let signing = &options.signing;
    if platform == PackagingPlatform::Ios {
        let profile = &signing.provisioning_profile_path;
        if is_unset(profile) {
            emit(problem(
                "iOS provisioning profile is not set".to_string(),
                "ios.provisioning.profile.not.set",
                PackagingField::ProvisioningProfile,
            ));
        } else if !profile.is_file() {
            emit(problem(
                format!("iOS provisioning profile not found: {}", profile.display()),
                "ios.provisioning.profile.not.found",
                PackagingField::ProvisioningProfile,
            ));
        }
    }

    // iOS cannot sign with a temporary certificate.
    let temp_certificate = platform != PackagingPlatform::Ios && signing.use_temp_certificate;
    if !temp_certificate {
        let keystore = &signing.keystore_path;
        if is_unset(keystore) {
            emit(problem(
                format!("Keystore is not set for {}", device),
                "keystore.not.set",
                PackagingField::Keystore,
            ));
        } else if !keystore.is_file() {
            emit(problem(
                format!("Keystore for {} not found: {}", device, keystore.display()),
                "keystore.not.found",
                PackagingField::Keystore,
            ));
        }
    }
}

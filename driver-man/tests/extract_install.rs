mod common;

use common::zip_bytes;
use driver_man::{Error, extract, place};
use tempfile::tempdir;

#[tokio::test]
async fn test_extract_zip() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("chromedriver_linux64.zip");
    std::fs::write(
        &archive,
        zip_bytes(&[
            ("chromedriver", b"#!/bin/sh\necho driver\n"),
            ("LICENSE.chromedriver", b"license text"),
        ]),
    )
    .unwrap();

    let dest = temp.path().join("cache");
    std::fs::create_dir(&dest).unwrap();
    extract(&archive, &dest).await.unwrap();

    assert_eq!(
        std::fs::read(dest.join("chromedriver")).unwrap(),
        b"#!/bin/sh\necho driver\n"
    );
    assert_eq!(
        std::fs::read(dest.join("LICENSE.chromedriver")).unwrap(),
        b"license text"
    );
}

#[tokio::test]
async fn test_extract_raw_binary() {
    let temp = tempdir().unwrap();
    let downloaded = temp.path().join("chromedriver-custom-build");
    let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    std::fs::write(&downloaded, &bytes).unwrap();

    let dest = temp.path().join("cache");
    extract(&downloaded, &dest).await.unwrap();

    let binary = dest.join(if cfg!(windows) {
        "chromedriver.exe"
    } else {
        "chromedriver"
    });
    assert_eq!(std::fs::read(binary).unwrap(), bytes);
    assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 1);
}

#[tokio::test]
async fn test_extract_corrupt_zip() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("chromedriver_linux64.zip");
    std::fs::write(&archive, b"<Error>AccessDenied</Error>").unwrap();

    let err = extract(&archive, temp.path()).await.unwrap_err();
    assert!(matches!(err, Error::Extract { .. }));
    assert!(err.to_string().starts_with("error extracting archive"));
}

#[tokio::test]
async fn test_place_replaces_target() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("cache");
    std::fs::create_dir_all(source.join("nested")).unwrap();
    std::fs::write(source.join("chromedriver"), "new driver").unwrap();
    std::fs::write(source.join("nested").join("notes.txt"), "notes").unwrap();

    let target = temp.path().join("lib").join("chromedriver");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("stale"), "old").unwrap();
    std::fs::write(target.join("chromedriver"), "old driver").unwrap();

    place(&source, &target).await.unwrap();

    assert!(!target.join("stale").exists());
    assert_eq!(
        std::fs::read_to_string(target.join("chromedriver")).unwrap(),
        "new driver"
    );
    assert_eq!(
        std::fs::read_to_string(target.join("nested").join("notes.txt")).unwrap(),
        "notes"
    );
    assert!(source.join("chromedriver").exists());
}

#[tokio::test]
async fn test_place_into_missing_target() {
    let temp = tempdir().unwrap();
    let source = temp.path().join("cache");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("chromedriver"), "driver").unwrap();

    let target = temp.path().join("lib");
    place(&source, &target).await.unwrap();
    assert_eq!(std::fs::read_dir(&target).unwrap().count(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn test_fix_permissions() {
    use driver_man::fix_permissions;
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let archive = temp.path().join("chromedriver_mac64.zip");
    std::fs::write(&archive, zip_bytes(&[("chromedriver", b"#!/bin/sh\n")])).unwrap();
    extract(&archive, temp.path()).await.unwrap();

    let binary = temp.path().join("chromedriver");
    let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
    assert_eq!(mode & 0o100, 0);

    fix_permissions(&binary).await.unwrap();
    let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[cfg(unix)]
#[tokio::test]
async fn test_fix_permissions_keeps_executable_mode() {
    use driver_man::fix_permissions;
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().unwrap();
    let binary = temp.path().join("chromedriver");
    std::fs::write(&binary, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o700)).unwrap();

    fix_permissions(&binary).await.unwrap();
    let mode = std::fs::metadata(&binary).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
}

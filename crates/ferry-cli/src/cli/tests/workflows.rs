use ferry_core::config::FerryConfig;
use ferry_core::session::Session;
use ferry_core::store::{LocalObjectStore, ObjectStore};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::cli::commands::{run_download, run_ls, run_mirror, run_upload, Context};

struct Fixture {
    _store_root: TempDir,
    _download_dir: TempDir,
    ctx: Context,
}

impl Fixture {
    fn new() -> Self {
        let store_root = tempfile::tempdir().unwrap();
        let download_dir = tempfile::tempdir().unwrap();
        let cfg = FerryConfig {
            download_dir: download_dir.path().to_path_buf(),
            store_root: store_root.path().to_path_buf(),
            progress_interval_ms: 5,
            list_page_size: 2,
            ..FerryConfig::default()
        };
        let store: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(store_root.path()));
        Self {
            _store_root: store_root,
            _download_dir: download_dir,
            ctx: Context { cfg, store },
        }
    }

    fn put(&self, bucket: &str, key: &str, data: &[u8]) {
        let path = self.ctx.cfg.store_root.join(bucket).join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, data).unwrap();
    }

    fn bucket(&self, bucket: &str) {
        std::fs::create_dir_all(self.ctx.cfg.store_root.join(bucket)).unwrap();
    }

    fn downloaded(&self, rel: &str) -> Vec<u8> {
        std::fs::read(self.ctx.cfg.download_dir.join(rel)).unwrap()
    }
}

fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}

#[tokio::test]
async fn download_fetches_every_object() {
    let fx = Fixture::new();
    fx.put("photos", "a.jpg", b"aaaa");
    fx.put("photos", "2020/b.jpg", b"bb");
    fx.put("photos", "2020/c.jpg", b"c");

    let mut session = Session::new();
    let summary = run_download(&fx.ctx, &mut session, "photos", Some(2), false)
        .await
        .unwrap();
    assert_eq!(summary.transfers, 3);
    assert_eq!(summary.bytes_transferred, 7);
    assert_eq!(fx.downloaded("photos/a.jpg"), b"aaaa");
    assert_eq!(fx.downloaded("photos/2020/b.jpg"), b"bb");
    assert_eq!(session.downloaded_bucket(), Some("photos"));
}

#[tokio::test]
async fn download_refuses_existing_folder_and_resets_session() {
    let fx = Fixture::new();
    fx.put("photos", "a.jpg", b"a");
    std::fs::create_dir_all(fx.ctx.cfg.download_dir.join("photos")).unwrap();

    let mut session = Session::new();
    session.download.bucket = Some("older".into());
    let err = run_download(&fx.ctx, &mut session, "photos", None, false)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("already exists"));
    assert_eq!(session.downloaded_bucket(), None);

    run_download(&fx.ctx, &mut session, "photos", None, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn download_of_missing_bucket_fails() {
    let fx = Fixture::new();
    let mut session = Session::new();
    assert!(run_download(&fx.ctx, &mut session, "nope", None, false)
        .await
        .is_err());
}

#[tokio::test]
async fn upload_pushes_folder_with_relative_keys() {
    let fx = Fixture::new();
    fx.bucket("archive");
    let src = fx.ctx.cfg.download_dir.join("local/nested");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(src.join("x.txt"), b"xyz").unwrap();

    let mut session = Session::new();
    session.upload.src_directory = Some("local".into());
    let summary = run_upload(&fx.ctx, &mut session, "archive", Some("kms".into()), None)
        .await
        .unwrap();
    assert_eq!(summary.transfers, 1);
    assert_eq!(
        read(&fx.ctx.cfg.store_root.join("archive/nested/x.txt")),
        b"xyz"
    );
    assert_eq!(session.upload.dest_bucket.as_deref(), Some("archive"));
}

#[tokio::test]
async fn upload_failure_resets_upload_options() {
    let fx = Fixture::new();
    let src = fx.ctx.cfg.download_dir.join("local");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::write(src.join("x.txt"), b"xyz").unwrap();

    let mut session = Session::new();
    session.upload.src_directory = Some("local".into());
    // Destination bucket was never created.
    let err = run_upload(&fx.ctx, &mut session, "missing", None, None)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("1 of 1 transfers failed"));
    assert_eq!(session.upload.src_directory, None);
}

#[tokio::test]
async fn upload_requires_existing_source_directory() {
    let fx = Fixture::new();
    fx.bucket("archive");
    let mut session = Session::new();
    session.upload.src_directory = Some("never-downloaded".into());
    let err = run_upload(&fx.ctx, &mut session, "archive", None, None)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("does not exist"));
}

#[tokio::test]
async fn mirror_uploads_what_it_downloaded() {
    let fx = Fixture::new();
    fx.put("src", "one.bin", b"1");
    fx.put("src", "deep/two.bin", b"22");
    fx.bucket("dst");

    let mut session = Session::new();
    let (down, up) = run_mirror(&fx.ctx, &mut session, "src", "dst", None, Some(1), false)
        .await
        .unwrap();
    assert_eq!(down.transfers, 2);
    assert_eq!(up.transfers, 2);
    assert_eq!(read(&fx.ctx.cfg.store_root.join("dst/one.bin")), b"1");
    assert_eq!(read(&fx.ctx.cfg.store_root.join("dst/deep/two.bin")), b"22");
}

#[tokio::test]
async fn ls_reports_empty_bucket() {
    let fx = Fixture::new();
    fx.bucket("empty");
    let objects = run_ls(&fx.ctx, "empty").await.unwrap();
    assert!(objects.is_empty());
}

#[tokio::test]
async fn ls_lists_every_object_across_pages() {
    let fx = Fixture::new();
    fx.put("photos", "a.jpg", b"aaaa");
    fx.put("photos", "2020/b.jpg", b"bb");
    fx.put("photos", "2020/b.jpg.part", b"not staging");

    // Page size is 2 in the fixture, so this spans two pages.
    let objects = run_ls(&fx.ctx, "photos").await.unwrap();
    let listed: Vec<(&str, u64)> = objects.iter().map(|o| (o.key.as_str(), o.size)).collect();
    assert_eq!(
        listed,
        vec![("2020/b.jpg", 2), ("2020/b.jpg.part", 11), ("a.jpg", 4)]
    );
}

#[tokio::test]
async fn ls_of_missing_bucket_fails() {
    let fx = Fixture::new();
    let err = run_ls(&fx.ctx, "nope").await.unwrap_err();
    assert!(format!("{err:#}").contains("no such bucket"));
}

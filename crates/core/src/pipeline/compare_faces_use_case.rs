use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;

use crate::acquisition::domain::acquisition_error::AcquisitionError;
use crate::acquisition::domain::resource_ref::MediaKind;
use crate::acquisition::input_acquirer::InputAcquirer;
use crate::evaluation::domain::comparison_result::ComparisonResult;
use crate::evaluation::match_evaluator::MatchEvaluator;
use crate::pipeline::comparison_request::ComparisonRequest;
use crate::pipeline::scratch::Scratch;
use crate::sampling::frame_sampler::FrameSampler;
use crate::sampling::sampled_frame::SampledFrame;
use crate::shared::constants::NO_FRAMES_MESSAGE;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),
    #[error("{}", NO_FRAMES_MESSAGE)]
    NoFrames,
    #[error("failed to prepare work directory {path}: {source}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One comparison: acquire both inputs → sample the video → evaluate
/// each frame against the image → delete everything temporary.
pub struct CompareFacesUseCase {
    acquirer: InputAcquirer,
    sampler: FrameSampler,
    evaluator: MatchEvaluator,
    work_dir: PathBuf,
}

impl CompareFacesUseCase {
    pub fn new(
        acquirer: InputAcquirer,
        sampler: FrameSampler,
        evaluator: MatchEvaluator,
        work_dir: PathBuf,
    ) -> Self {
        Self {
            acquirer,
            sampler,
            evaluator,
            work_dir,
        }
    }

    pub fn execute(
        &mut self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResult, CompareError> {
        let started = Instant::now();
        log::info!(
            "Comparing image {} against video {}",
            request.image,
            request.video
        );

        fs::create_dir_all(&self.work_dir).map_err(|source| CompareError::Workspace {
            path: self.work_dir.clone(),
            source,
        })?;

        // Declared first so it is dropped last, after the sampled frames.
        let mut scratch = Scratch::new();

        let (video, download) = self
            .acquirer
            .acquire(&request.video, MediaKind::Video)?
            .into_parts();
        scratch.extend(download);

        let (image, download) = self
            .acquirer
            .acquire(&request.image, MediaKind::Image)?
            .into_parts();
        scratch.extend(download);

        let frames = self.sampler.sample(&video);
        if frames.is_empty() {
            log::warn!("{NO_FRAMES_MESSAGE}: {}", request.video);
            return Err(CompareError::NoFrames);
        }

        let result = self.evaluator.evaluate(&image, &frames);
        scratch.extend(frames.into_iter().map(SampledFrame::into_temp_path));

        log::info!(
            "{} frames sampled (interval {}), {} skipped, {} matches, match={} in {:.2}s",
            result.frames_sampled,
            self.sampler.interval(),
            result.frames_skipped,
            result.matches_found,
            result.is_match,
            started.elapsed().as_secs_f64()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::infrastructure::http_downloader::test_server::serve;
    use crate::acquisition::infrastructure::http_downloader::HttpDownloader;
    use crate::shared::frame::Frame;
    use crate::shared::video_metadata::VideoMetadata;
    use crate::verification::domain::face_verifier::FaceVerifier;
    use crate::verification::domain::verification_outcome::VerificationOutcome;
    use crate::video::domain::video_reader::VideoReader;
    use crate::video::infrastructure::image_file_writer::ImageFileWriter;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    // --- Stubs ---

    /// Yields `count` frames regardless of the file it is given.
    struct StubVideoReader {
        count: usize,
        opened: Arc<AtomicUsize>,
    }

    impl VideoReader for StubVideoReader {
        fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(VideoMetadata {
                width: 8,
                height: 8,
                fps: 25.0,
                total_frames: self.count,
                codec: "stub".to_string(),
                source_path: Some(path.to_path_buf()),
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new((0..self.count).map(|i| Ok(Frame::new(vec![90; 8 * 8 * 3], 8, 8, i))))
        }

        fn close(&mut self) {}
    }

    struct CountingVerifier {
        verified: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FaceVerifier for CountingVerifier {
        fn verify(
            &mut self,
            reference: &Path,
            candidate: &Path,
        ) -> Result<VerificationOutcome, Box<dyn std::error::Error>> {
            assert!(reference.exists());
            assert!(candidate.exists());
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(VerificationOutcome::new(self.verified).with_diagnostic("distance", 0.2))
        }
    }

    // --- Helpers ---

    struct Harness {
        use_case: CompareFacesUseCase,
        opened: Arc<AtomicUsize>,
        calls: Arc<AtomicUsize>,
    }

    fn harness(work_dir: &Path, frame_count: usize, verified: bool) -> Harness {
        let opened = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let sampler = FrameSampler::new(
            Box::new(StubVideoReader {
                count: frame_count,
                opened: opened.clone(),
            }),
            Box::new(ImageFileWriter::new()),
            10,
            None,
            work_dir.to_path_buf(),
        )
        .unwrap();
        let evaluator = MatchEvaluator::new(Box::new(CountingVerifier {
            verified,
            calls: calls.clone(),
        }));
        let acquirer = InputAcquirer::new(
            HttpDownloader::new(None).unwrap(),
            work_dir.to_path_buf(),
            None,
        );
        Harness {
            use_case: CompareFacesUseCase::new(acquirer, sampler, evaluator, work_dir.to_path_buf()),
            opened,
            calls,
        }
    }

    fn local_inputs(dir: &Path) -> ComparisonRequest {
        let video = dir.join("clip.mp4");
        let image = dir.join("face.jpg");
        fs::write(&video, b"video").unwrap();
        fs::write(&image, b"image").unwrap();
        ComparisonRequest::new(video.to_str().unwrap(), image.to_str().unwrap())
    }

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    // --- Tests ---

    #[test]
    fn test_local_inputs_match() {
        let inputs = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let mut h = harness(work.path(), 25, true);

        let result = h.use_case.execute(&local_inputs(inputs.path())).unwrap();
        assert_eq!(result.frames_sampled, 3);
        assert_eq!(result.matches_found, 3);
        assert!(result.is_match);
        assert_eq!(h.calls.load(Ordering::SeqCst), 3);
        assert_eq!(entries(work.path()), 0);
        // Caller-owned files are never deleted.
        assert_eq!(entries(inputs.path()), 2);
    }

    #[test]
    fn test_no_match_keeps_last_outcome() {
        let inputs = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let mut h = harness(work.path(), 25, false);

        let result = h.use_case.execute(&local_inputs(inputs.path())).unwrap();
        assert!(!result.is_match);
        assert_eq!(result.matches_found, 0);
        assert!(result.last_outcome.is_some());
    }

    #[test]
    fn test_downloaded_inputs_are_removed() {
        let (base, handle) = serve(200, b"payload".to_vec(), 2);
        let work = tempfile::tempdir().unwrap();
        let mut h = harness(work.path(), 25, true);

        let request =
            ComparisonRequest::new(format!("{base}/clip.mp4"), format!("{base}/face.jpg"));
        let result = h.use_case.execute(&request).unwrap();
        handle.join().unwrap();

        assert!(result.is_match);
        assert_eq!(entries(work.path()), 0);
    }

    #[test]
    fn test_no_frames_skips_verification() {
        let inputs = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let mut h = harness(work.path(), 0, true);

        let err = h.use_case.execute(&local_inputs(inputs.path())).unwrap_err();
        assert!(matches!(err, CompareError::NoFrames));
        assert_eq!(err.to_string(), NO_FRAMES_MESSAGE);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_frames_removes_downloaded_video() {
        let (base, handle) = serve(200, b"payload".to_vec(), 2);
        let work = tempfile::tempdir().unwrap();
        let mut h = harness(work.path(), 0, true);

        let request =
            ComparisonRequest::new(format!("{base}/clip.mp4"), format!("{base}/face.jpg"));
        assert!(h.use_case.execute(&request).is_err());
        handle.join().unwrap();
        assert_eq!(entries(work.path()), 0);
    }

    #[test]
    fn test_unreachable_video_never_samples() {
        let inputs = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let mut h = harness(work.path(), 25, true);

        let mut request = local_inputs(inputs.path());
        request.video = "http://127.0.0.1:1/clip.mp4".to_string();
        let err = h.use_case.execute(&request).unwrap_err();

        assert!(matches!(err, CompareError::Acquisition(_)));
        assert_eq!(h.opened.load(Ordering::SeqCst), 0);
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_image_removes_downloaded_video() {
        let (base, handle) = serve(200, b"payload".to_vec(), 1);
        let work = tempfile::tempdir().unwrap();
        let mut h = harness(work.path(), 25, true);

        let request = ComparisonRequest::new(format!("{base}/clip.mp4"), "/nonexistent/face.jpg");
        let err = h.use_case.execute(&request).unwrap_err();
        handle.join().unwrap();

        assert!(matches!(
            err,
            CompareError::Acquisition(AcquisitionError::NotFound { .. })
        ));
        assert_eq!(h.opened.load(Ordering::SeqCst), 0);
        assert_eq!(entries(work.path()), 0);
    }

    #[test]
    fn test_recreates_missing_work_dir() {
        let inputs = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let work = root.path().join("facematch");
        let mut h = harness(&work, 5, true);

        h.use_case.execute(&local_inputs(inputs.path())).unwrap();
        assert!(work.is_dir());
        assert_eq!(entries(&work), 0);
    }

    #[test]
    fn test_unusable_work_dir_is_workspace_error() {
        let inputs = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let mut h = harness(&blocker.join("work"), 5, true);

        let err = h.use_case.execute(&local_inputs(inputs.path())).unwrap_err();
        assert!(matches!(err, CompareError::Workspace { .. }));
    }
}

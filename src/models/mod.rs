pub mod artifact;
pub mod job;
pub mod lesson;
pub mod loaders;
pub mod quiz;
pub mod request;
pub mod subject;
pub mod unit;

pub use artifact::{ArtifactSlot, GeneratedArtifact};
pub use job::{AssignmentJob, Job, JobFile, QuizJob, UnitJob};
pub use lesson::{LessonPlan, LessonPlanOutput, Slide, SlideResponse};
pub use loaders::{load_all_job_files, load_job_file};
pub use quiz::{Question, Quiz};
pub use request::{Accommodations, QuestionType, QuizRequest, UnitContext};
pub use subject::Subject;
pub use unit::{ItemKind, UnitSequence, UnitSequenceItem};

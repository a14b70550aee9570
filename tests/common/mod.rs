#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace, creating parent
    /// directories as needed, and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

pub const SUBJECTS_CSV: &str = "\
subject_name,color,icon,active
Math,blue,calc,true
Physics,red,atom,no
";

pub const SUBJECTS_JSON: &str = r#"{"data": [
  {"subject_name": "Math", "color": "blue", "icon": "calc", "active": true},
  {"subject_name": "Physics", "color": "red", "icon": "atom", "active": false}
]}"#;

pub const CATEGORIES_CSV: &str = "\
category_name,subject_name,difficulty,active
Algebra,Math,3,yes
";

pub const CATEGORIES_JSON: &str = r#"{"categories": [
  {"category_name": "Algebra", "subject_name": "Math", "difficulty": 3, "active": true}
]}"#;

pub const STUDY_TASKS_CSV: &str = "\
task_id,task_name,description,categories,correctly_completed,start_time,end_time,W szkole,subject,session_id
t1,Review,Equations,Algebra,true,2024-05-06 14:00,2024-05-06 14:30,tak,Math,s1
";

pub const STUDY_TASKS_JSON: &str = r#"{"tasks": [
  {"task_id": "t1", "task_name": "Review", "description": "Equations",
   "categories": "Algebra", "correctly_completed": "true",
   "start_time": "2024-05-06 14:00", "end_time": "2024-05-06 14:30",
   "W szkole": "tak", "subject": "Math", "session_id": "s1"}
]}"#;

pub const STUDY_SESSIONS_CSV: &str = "\
session_id,start_time,end_time,duration_minutes,total_tasks,correct_tasks,accuracy_percentage,notes,date
s1,2024-05-06 14:00,2024-05-06 15:00,60,4,3,75.5,solid run,2024-05-06
";

pub const STUDY_SESSIONS_JSON: &str = r#"{"sessions": [
  {"session_id": "s1", "start_time": "2024-05-06 14:00", "end_time": "2024-05-06 15:00",
   "duration_minutes": 60, "total_tasks": 4, "correct_tasks": 3,
   "accuracy_percentage": 75.5, "notes": "solid run"}
]}"#;

/// Lays out a fully matching pair of export directories under the workspace.
pub fn write_matching_exports(ws: &TestWorkspace) {
    ws.write("analistData/Matura - Subjects.csv", SUBJECTS_CSV);
    ws.write("analistData/Matura - Categories.csv", CATEGORIES_CSV);
    ws.write("analistData/Matura - StudyTasks.csv", STUDY_TASKS_CSV);
    ws.write("analistData/Matura - StudySessions.csv", STUDY_SESSIONS_CSV);
    ws.write("tmp_gas_data/subjects.json", SUBJECTS_JSON);
    ws.write("tmp_gas_data/categories.json", CATEGORIES_JSON);
    ws.write("tmp_gas_data/study_tasks.json", STUDY_TASKS_JSON);
    ws.write("tmp_gas_data/study_sessions.json", STUDY_SESSIONS_JSON);
}

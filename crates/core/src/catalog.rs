//! The static course catalog.
//!
//! Catalog data is immutable, owned by the process, and shared read-only by
//! every caller. There are no mutation operations.

use crate::model::{Course, CourseId, CourseLevel, Lesson, LessonId};

/// The fixed set of courses and their lessons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    courses: Vec<Course>,
}

impl Catalog {
    /// Builds a catalog from an explicit course list, in the given order.
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// The built-in demo catalog.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![
            web_development(),
            python_masterclass(),
            data_science(),
            ui_ux_design(),
        ])
    }

    /// All courses in stable catalog order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Looks a course up by id. Absent is not an error.
    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id() == id)
    }

    /// Number of lessons in a course; 0 when the course does not exist.
    #[must_use]
    pub fn lesson_count(&self, id: CourseId) -> usize {
        self.course(id).map_or(0, Course::lesson_count)
    }
}

fn lesson(id: u64, title: &str, duration: &str, content: &str) -> Lesson {
    Lesson::new(LessonId::new(id), title, duration, content)
}

fn web_development() -> Course {
    Course::new(
        CourseId::new(1),
        "Introduction to Web Development",
        "Learn the fundamentals of HTML, CSS, and JavaScript to build modern websites from scratch.",
        "🌐",
        "8 weeks",
        CourseLevel::Beginner,
        vec![
            lesson(
                1,
                "Introduction to HTML",
                "45 min",
                "Learn the basic structure of HTML documents and common HTML tags.",
            ),
            lesson(
                2,
                "CSS Fundamentals",
                "60 min",
                "Understand how to style web pages using CSS selectors and properties.",
            ),
            lesson(
                3,
                "JavaScript Basics",
                "90 min",
                "Get started with JavaScript programming language and DOM manipulation.",
            ),
            lesson(
                4,
                "Responsive Design",
                "75 min",
                "Create responsive layouts that work on all devices using modern CSS techniques.",
            ),
            lesson(
                5,
                "Building Your First Website",
                "120 min",
                "Put everything together and build a complete website from scratch.",
            ),
        ],
    )
}

fn python_masterclass() -> Course {
    Course::new(
        CourseId::new(2),
        "Python Programming Masterclass",
        "Master Python programming from beginner to advanced concepts including data structures and algorithms.",
        "🐍",
        "12 weeks",
        CourseLevel::Intermediate,
        vec![
            lesson(
                1,
                "Python Basics and Syntax",
                "60 min",
                "Learn Python syntax, variables, data types, and basic operations.",
            ),
            lesson(
                2,
                "Control Flow and Functions",
                "75 min",
                "Master if statements, loops, and how to write reusable functions.",
            ),
            lesson(
                3,
                "Data Structures",
                "90 min",
                "Understand lists, tuples, dictionaries, and sets in Python.",
            ),
            lesson(
                4,
                "Object-Oriented Programming",
                "120 min",
                "Learn classes, objects, inheritance, and polymorphism.",
            ),
            lesson(
                5,
                "File Handling and Modules",
                "60 min",
                "Work with files and learn to import and use Python modules.",
            ),
            lesson(
                6,
                "Final Project",
                "180 min",
                "Build a complete Python application using everything you've learned.",
            ),
        ],
    )
}

fn data_science() -> Course {
    Course::new(
        CourseId::new(3),
        "Data Science Fundamentals",
        "Explore data analysis, visualization, and machine learning basics using Python and popular libraries.",
        "📊",
        "10 weeks",
        CourseLevel::Intermediate,
        vec![
            lesson(
                1,
                "Introduction to Data Science",
                "45 min",
                "Understand what data science is and its applications in various industries.",
            ),
            lesson(
                2,
                "NumPy for Data Analysis",
                "90 min",
                "Learn to work with arrays and perform numerical computations.",
            ),
            lesson(
                3,
                "Pandas for Data Manipulation",
                "120 min",
                "Master data manipulation and analysis using Pandas DataFrames.",
            ),
            lesson(
                4,
                "Data Visualization with Matplotlib",
                "75 min",
                "Create beautiful and informative visualizations of your data.",
            ),
            lesson(
                5,
                "Introduction to Machine Learning",
                "90 min",
                "Learn the basics of machine learning and build your first model.",
            ),
        ],
    )
}

fn ui_ux_design() -> Course {
    Course::new(
        CourseId::new(4),
        "UI/UX Design Principles",
        "Learn how to create beautiful, user-friendly interfaces and enhance user experience in digital products.",
        "🎨",
        "6 weeks",
        CourseLevel::Beginner,
        vec![
            lesson(
                1,
                "Introduction to UI/UX",
                "40 min",
                "Understand the difference between UI and UX and why both matter.",
            ),
            lesson(
                2,
                "Design Thinking Process",
                "60 min",
                "Learn the design thinking methodology for solving user problems.",
            ),
            lesson(
                3,
                "Color Theory and Typography",
                "75 min",
                "Master the principles of color and typography in design.",
            ),
            lesson(
                4,
                "Wireframing and Prototyping",
                "90 min",
                "Create wireframes and interactive prototypes for your designs.",
            ),
            lesson(
                5,
                "User Research and Testing",
                "60 min",
                "Learn how to conduct user research and usability testing.",
            ),
            lesson(
                6,
                "Design Portfolio Project",
                "120 min",
                "Build a complete UI/UX project for your portfolio.",
            ),
        ],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doctor {
    pub id: &'static str,
    pub name: &'static str,
    pub specialty: &'static str,
    pub experience: &'static str,
}

pub const DOCTORS: [Doctor; 3] = [
    Doctor {
        id: "dr-rajesh",
        name: "Dr. Rajesh Kumar",
        specialty: "Senior Physiotherapist",
        experience: "15+ years",
    },
    Doctor {
        id: "dr-priya",
        name: "Dr. Priya Sharma",
        specialty: "Sports Physiotherapist",
        experience: "10+ years",
    },
    Doctor {
        id: "dr-amit",
        name: "Dr. Amit Patel",
        specialty: "Neurological Specialist",
        experience: "12+ years",
    },
];

impl Doctor {
    pub fn find(id: &str) -> Option<&'static Doctor> {
        DOCTORS.iter().find(|doctor| doctor.id == id)
    }

    pub fn all() -> &'static [Doctor] {
        &DOCTORS
    }
}

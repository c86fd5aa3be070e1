use rocketfile::config::Config;
use rocketfile::motors::MotorIndex;
use rocketfile::warnings::{Warning, WarningSet};
use rocketfile::{document, Format};
use rocketfile_core::models::{ComponentKind, Motor};
use speculate2::speculate;

fn motor(manufacturer: &str, designation: &str) -> Motor {
    Motor {
        manufacturer: manufacturer.to_string(),
        designation: designation.to_string(),
        digest: format!("{}:{}", manufacturer, designation),
        diameter: 0.018,
        length: 0.07,
        total_impulse: 10.0,
    }
}

const DESIGN: &str = r#"<RASAeroDocument>
  <RocketDesign>
    <BodyTube>
      <PartType>BodyTube</PartType>
      <Length>12</Length>
      <Diameter>1</Diameter>
    </BodyTube>
  </RocketDesign>
  <SimulationList>
    <Simulation>
      <SustainerEngine>C6-5  (Estes)</SustainerEngine>
    </Simulation>
  </SimulationList>
</RASAeroDocument>"#;

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config::new(Some(dir.path().join("data").join("motors.db")), None);
        let db = config.open_motor_database().expect("Failed to open motor database");
        db.insert_motors(&[
            motor("Apogee Components", "1/4A2"),
            motor("Estes", "C6"),
            motor("AeroTech", "G80"),
        ])
        .expect("Failed to insert motors");
    }

    describe "database-backed index" {
        it "loads lazily from the database" {
            let index = MotorIndex::new(db.clone());
            assert!(!index.is_loaded());
            assert_eq!(index.len(), 3);
            assert!(index.is_loaded());
        }

        it "resolves manufacturer abbreviations" {
            let index = MotorIndex::new(db.clone());
            let mut warnings = WarningSet::new();
            let mount = index.resolve("1/4A2  (AP)", &mut warnings).expect("motor not found");
            assert_eq!(mount.motor.manufacturer, "Apogee Components");
            assert!(warnings.is_empty());
        }

        it "treats descriptors without a separator as no motor" {
            let index = MotorIndex::new(db.clone());
            let mut warnings = WarningSet::new();
            assert!(index.resolve("BadFormat", &mut warnings).is_none());
            assert!(warnings.is_empty());
        }

        it "treats a missing manufacturer as no motor" {
            let index = MotorIndex::new(db.clone());
            let mut warnings = WarningSet::new();
            assert!(index.resolve("A8  ", &mut warnings).is_none());
            assert!(warnings.is_empty());
        }

        it "warns about unknown motors" {
            let index = MotorIndex::new(db.clone());
            let mut warnings = WarningSet::new();
            assert!(index.resolve("Unknown1  (NoSuchMfr)", &mut warnings).is_none());
            assert_eq!(warnings.len(), 1);
            assert_eq!(
                warnings.iter().next(),
                Some(&Warning::MotorNotFound { descriptor: "Unknown1  (NoSuchMfr)".to_string() })
            );
        }

        it "picks up new motors after clear" {
            let mut index = MotorIndex::new(db.clone());
            assert_eq!(index.len(), 3);
            db.insert_motor(&motor("Cesaroni", "H100")).expect("Failed to insert");
            assert_eq!(index.len(), 3);
            index.clear();
            assert!(!index.is_loaded());
            assert_eq!(index.len(), 4);
        }
    }

    describe "import with motors" {
        it "mounts the simulation motor on the sustainer tube" {
            let index = MotorIndex::new(db.clone());
            let outcome = document::import(Format::RasAero, DESIGN.as_bytes(), &index)
                .expect("import failed");
            assert!(outcome.warnings.is_empty(), "{}", outcome.warnings);

            let tube = outcome.rocket.find_by_name("Body Tube").expect("no body tube");
            let ComponentKind::BodyTube(body) = &outcome.rocket.get(tube).unwrap().kind else {
                panic!("expected a body tube");
            };
            let mount = body.motor.as_ref().expect("no motor mounted");
            assert_eq!(mount.motor.designation, "C6");
            assert_eq!(mount.ejection_delay, Some(5.0));
        }

        it "imports without motors when the index is empty" {
            let outcome = document::import(Format::RasAero, DESIGN.as_bytes(), &MotorIndex::empty())
                .expect("import failed");
            assert_eq!(outcome.warnings.len(), 1);
            assert_eq!(outcome.rocket.stage_count(), 1);
        }
    }
}

use ergplan_core::Workout;
use serde::Serialize;

#[derive(Serialize)]
struct WorkoutInfo {
    id: &'static str,
    intensity: ergplan_core::Intensity,
    heart_rate: u16,
    rpe: u8,
    description: &'static str,
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let infos: Vec<WorkoutInfo> = Workout::ALL
        .into_iter()
        .map(|w| WorkoutInfo {
            id: w.id(),
            intensity: w.intensity(),
            heart_rate: w.base_heart_rate(),
            rpe: w.base_rpe(),
            description: w.description(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for info in &infos {
            println!(
                "{:<6} {:<5} {:>3} bpm  RPE {:>2}  {}",
                info.id,
                format!("{:?}", info.intensity).to_lowercase(),
                info.heart_rate,
                info.rpe,
                info.description
            );
        }
    }
    Ok(())
}
